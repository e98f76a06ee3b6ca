//! 产品存储基础设施

use serde_json::{Map, Number};
use std::sync::{Arc, Mutex};

use crate::app::product::model::Product;

/// 产品存储抽象
///
/// 保持插入顺序；调用方通过 [`SharedStore`] 的互斥锁保证读改写的原子性。
pub trait ProductStore: Send {
    fn list(&self) -> &[Product];
    fn get(&self, id: &str) -> Option<&Product>;
    fn insert(&mut self, product: Product);
    /// 替换指定 id 的记录，返回旧记录
    fn replace(&mut self, id: &str, product: Product) -> Option<Product>;
    fn remove(&mut self, id: &str) -> Option<Product>;
}

pub type SharedStore = Arc<Mutex<dyn ProductStore>>;

/// 基于 `Vec` 的内存存储
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    products: Vec<Product>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带三条示例数据的存储
    pub fn seeded() -> Self {
        let products = vec![
            sample(
                "1",
                "Laptop",
                "High-performance laptop with 16GB RAM",
                1200,
                "electronics",
                true,
            ),
            sample(
                "2",
                "Smartphone",
                "Latest model with 128GB storage",
                800,
                "electronics",
                true,
            ),
            sample(
                "3",
                "Coffee Maker",
                "Programmable coffee maker with timer",
                50,
                "kitchen",
                false,
            ),
        ];
        Self { products }
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }
}

fn sample(
    id: &str,
    name: &str,
    description: &str,
    price: u64,
    category: &str,
    in_stock: bool,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price: Number::from(price),
        description: Some(description.to_string()),
        category: Some(category.to_string()),
        in_stock: Some(in_stock),
        extra: Map::new(),
    }
}

impl ProductStore for InMemoryProductStore {
    fn list(&self) -> &[Product] {
        &self.products
    }

    fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn insert(&mut self, product: Product) {
        self.products.push(product);
    }

    fn replace(&mut self, id: &str, product: Product) -> Option<Product> {
        let index = self.position(id)?;
        Some(std::mem::replace(&mut self.products[index], product))
    }

    fn remove(&mut self, id: &str) -> Option<Product> {
        let index = self.position(id)?;
        Some(self.products.remove(index))
    }
}
