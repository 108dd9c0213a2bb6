use anyhow::Result;
use chrono::{Duration, Utc};
use imon_store::{minimum_stock_namespace, CacheEntry, TOTAL_PRODUCTS_KEY, CATALOG_NAMESPACE};

use super::{load_config, open_cache};

fn print_entry(ns: &str, entry: Option<&CacheEntry>, max_age: Option<Duration>) {
    let Some(e) = entry else {
        println!("namespace={ns} present=false");
        return;
    };
    let age = e.age(Utc::now());
    let fresh = max_age.map(|m| age <= m);
    println!(
        "namespace={ns} present=true rows={} last_updated={} age_minutes={} fresh={}",
        e.data_len(),
        e.last_updated.to_rfc3339(),
        age.num_minutes(),
        fresh.map(|f| f.to_string()).unwrap_or_else(|| "n/a".into()),
    );
    if let Some(total) = e.extra_metadata.get(TOTAL_PRODUCTS_KEY) {
        println!("namespace={ns} total_products={total}");
    }
}

/// `imon cache status`: what the store holds, without any network call.
pub fn status(config_paths: &[String], user: Option<&str>) -> Result<()> {
    let (_loaded, cfg) = load_config(config_paths)?;
    let cache = open_cache(&cfg);
    let max_age = cfg.cache.catalog_max_age();

    println!("cache_dir={}", cfg.cache.dir.display());
    println!("catalog_max_age_hours={}", cfg.cache.catalog_max_age_hours);

    // Age check disabled here so stale entries are still reported.
    let catalog = cache.load(CATALOG_NAMESPACE, None);
    print_entry(CATALOG_NAMESPACE, catalog.as_ref(), Some(max_age));

    if let Some(user) = user {
        let ns = minimum_stock_namespace(user);
        let list = cache.load(&ns, None);
        print_entry(&ns, list.as_ref(), None);
    }
    Ok(())
}
