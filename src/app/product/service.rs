//! 产品业务服务

use std::collections::BTreeMap;
use std::sync::MutexGuard;

use serde_json::{Map, Value};
use tracing::{debug, error};
use uuid::Uuid;

use super::model::{ListQuery, Product, ProductStats};
use crate::core::error::{CoreError, CoreResult};
use crate::core::response::PageResponse;
use crate::infrastructure::store::{ProductStore, SharedStore};

#[derive(Clone)]
pub struct ProductService {
    store: SharedStore,
}

impl ProductService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 每个操作只加一次锁，查找与修改在同一临界区内完成
    fn lock(&self) -> CoreResult<MutexGuard<'_, dyn ProductStore + 'static>> {
        self.store.lock().map_err(|e| {
            error!("产品存储锁已损坏: {}", e);
            CoreError::Server("Something went wrong".to_string())
        })
    }

    pub fn list_products(&self, query: &ListQuery) -> CoreResult<PageResponse<Product>> {
        let store = self.lock()?;

        let filtered: Vec<&Product> = match non_empty(query.category.as_deref()) {
            Some(category) => store
                .list()
                .iter()
                .filter(|p| p.in_category(category))
                .collect(),
            None => store.list().iter().collect(),
        };

        let total = filtered.len();
        let page = parse_positive_or(query.page.as_deref(), 1);
        let limit = parse_positive_or(query.limit.as_deref(), total as i64);
        let (start, end) = page_window(page, limit, total);

        let products = filtered[start..end].iter().map(|p| (*p).clone()).collect();

        Ok(PageResponse {
            page,
            limit,
            total,
            products,
        })
    }

    pub fn search_by_name(&self, name: &str) -> CoreResult<Vec<Product>> {
        let store = self.lock()?;
        Ok(store
            .list()
            .iter()
            .filter(|p| p.name_contains(name))
            .cloned()
            .collect())
    }

    pub fn stats(&self) -> CoreResult<ProductStats> {
        let store = self.lock()?;

        let mut count_by_category = BTreeMap::new();
        for category in store.list().iter().filter_map(|p| p.category.as_ref()) {
            *count_by_category.entry(category.clone()).or_insert(0) += 1;
        }

        Ok(ProductStats {
            total_products: store.list().len(),
            count_by_category,
        })
    }

    pub fn get_product(&self, id: &str) -> CoreResult<Product> {
        let store = self.lock()?;
        store
            .get(id)
            .cloned()
            .ok_or_else(CoreError::product_not_found)
    }

    /// 创建产品，请求体中的 `id` 会被新生成的 id 覆盖
    pub fn create_product(&self, mut fields: Map<String, Value>) -> CoreResult<Product> {
        ensure_required(&fields)?;

        fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        let product = Product::from_fields(fields)?;

        let mut store = self.lock()?;
        store.insert(product.clone());
        debug!("产品已创建: {}", product.id);

        Ok(product)
    }

    /// 浅合并更新；请求体携带的 `id` 会覆盖路径中的 id
    pub fn update_product(&self, id: &str, fields: Map<String, Value>) -> CoreResult<Product> {
        let mut store = self.lock()?;

        let current = store
            .get(id)
            .cloned()
            .ok_or_else(CoreError::product_not_found)?;
        let updated = current.merged_with(fields)?;

        store.replace(id, updated.clone());
        debug!("产品已更新: {} -> {}", id, updated.id);

        Ok(updated)
    }

    pub fn delete_product(&self, id: &str) -> CoreResult<Product> {
        let mut store = self.lock()?;
        let removed = store.remove(id).ok_or_else(CoreError::product_not_found)?;
        debug!("产品已删除: {}", id);
        Ok(removed)
    }
}

fn ensure_required(fields: &Map<String, Value>) -> CoreResult<()> {
    let present = |key: &str| fields.get(key).is_some_and(super::model::is_truthy);
    if present("name") && present("price") {
        Ok(())
    } else {
        Err(CoreError::Validation("Name and price are required".to_string()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// 宽松整数解析：忽略前导空白，读取可选符号与连续数字，忽略后续字符
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// 解析结果缺失或为 0 时使用默认值
fn parse_positive_or(raw: Option<&str>, default: i64) -> i64 {
    match raw.and_then(parse_int_prefix) {
        Some(0) | None => default,
        Some(n) => n,
    }
}

/// 计算 `[(page-1)*limit, page*limit)` 并裁剪到 `[0, total]`
fn page_window(page: i64, limit: i64, total: usize) -> (usize, usize) {
    let clamp = |n: i64| n.clamp(0, total as i64) as usize;

    let start = clamp(page.saturating_sub(1).saturating_mul(limit));
    let end = clamp(page.saturating_mul(limit));

    if start >= end {
        (0, 0)
    } else {
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryProductStore;
    use serde_json::json;

    fn service() -> ProductService {
        ProductService::new(InMemoryProductStore::seeded().into_shared())
    }

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn query(category: Option<&str>, page: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            category: category.map(String::from),
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("2"), Some(2));
        assert_eq!(parse_int_prefix("  7"), Some(7));
        assert_eq!(parse_int_prefix("2abc"), Some(2));
        assert_eq!(parse_int_prefix("1.5"), Some(1));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 3, 3), (0, 3));
        assert_eq!(page_window(2, 1, 3), (1, 2));
        assert_eq!(page_window(2, 2, 3), (2, 3));
        assert_eq!(page_window(5, 2, 3), (0, 0));
        assert_eq!(page_window(-1, 2, 3), (0, 0));
        assert_eq!(page_window(1, 0, 0), (0, 0));
    }

    #[test]
    fn test_list_defaults_to_everything() {
        let page = service().list_products(&ListQuery::default()).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 3);
        assert_eq!(page.total, 3);
        assert_eq!(ids(&page.products), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_list_non_numeric_paging_falls_back() {
        let page = service()
            .list_products(&query(None, Some("abc"), Some("zero")))
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 3);
        assert_eq!(page.products.len(), 3);
    }

    #[test]
    fn test_list_filters_by_category_case_insensitively() {
        let svc = service();
        let upper = svc.list_products(&query(Some("Electronics"), None, None)).unwrap();
        let lower = svc.list_products(&query(Some("electronics"), None, None)).unwrap();

        assert_eq!(upper.total, 2);
        assert_eq!(ids(&upper.products), ids(&lower.products));
    }

    #[test]
    fn test_list_paginates_filtered_set() {
        let page = service()
            .list_products(&query(Some("electronics"), Some("2"), Some("1")))
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(ids(&page.products), vec!["2"]);
    }

    #[test]
    fn test_list_out_of_range_page_is_empty() {
        let page = service()
            .list_products(&query(None, Some("9"), Some("2")))
            .unwrap();
        assert_eq!(page.total, 3);
        assert!(page.products.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let results = service().search_by_name("PHONE").unwrap();
        assert_eq!(ids(&results), vec!["2"]);

        let results = service().search_by_name("o").unwrap();
        assert_eq!(ids(&results), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_stats_counts_by_category() {
        let stats = service().stats().unwrap();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.count_by_category.get("electronics"), Some(&2));
        assert_eq!(stats.count_by_category.get("kitchen"), Some(&1));
        assert_eq!(stats.count_by_category.len(), 2);
    }

    #[test]
    fn test_stats_skips_uncategorized() {
        let svc = service();
        svc.create_product(fields(json!({ "name": "Mystery", "price": 5 })))
            .unwrap();
        let stats = svc.stats().unwrap();
        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.count_by_category.values().sum::<usize>(), 3);
    }

    #[test]
    fn test_create_overwrites_submitted_id() {
        let svc = service();
        let created = svc
            .create_product(fields(json!({ "id": "1", "name": "Desk", "price": 150 })))
            .unwrap();

        assert_ne!(created.id, "1");
        assert!(!created.id.is_empty());
        assert_eq!(svc.get_product(&created.id).unwrap(), created);
        assert_eq!(svc.get_product("1").unwrap().name, "Laptop");
    }

    #[test]
    fn test_create_generates_unique_ids() {
        let svc = service();
        let a = svc
            .create_product(fields(json!({ "name": "A", "price": 1 })))
            .unwrap();
        let b = svc
            .create_product(fields(json!({ "name": "B", "price": 2 })))
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let err = service()
            .create_product(fields(json!({ "name": "Free", "price": 0 })))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation("Name and price are required".to_string())
        );
    }

    #[test]
    fn test_update_merges_fields() {
        let svc = service();
        let updated = svc
            .update_product("1", fields(json!({ "name": "Laptop", "price": 999 })))
            .unwrap();

        assert_eq!(updated.price, serde_json::Number::from(999));
        assert_eq!(
            updated.description.as_deref(),
            Some("High-performance laptop with 16GB RAM")
        );
        assert_eq!(updated.category.as_deref(), Some("electronics"));
        assert_eq!(updated.in_stock, Some(true));
    }

    #[test]
    fn test_update_body_id_overrides_path_id() {
        let svc = service();
        let updated = svc
            .update_product("1", fields(json!({ "id": "99", "name": "X", "price": 1 })))
            .unwrap();

        assert_eq!(updated.id, "99");
        assert!(svc.get_product("1").is_err());
        assert_eq!(svc.get_product("99").unwrap().name, "X");
    }

    #[test]
    fn test_update_missing_product() {
        let err = service()
            .update_product("nope", fields(json!({ "name": "X", "price": 1 })))
            .unwrap_err();
        assert_eq!(err, CoreError::product_not_found());
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let svc = service();
        let removed = svc.delete_product("3").unwrap();
        assert_eq!(removed.name, "Coffee Maker");
        assert_eq!(svc.get_product("3").unwrap_err(), CoreError::product_not_found());
        assert_eq!(svc.delete_product("3").unwrap_err(), CoreError::product_not_found());
    }
}
