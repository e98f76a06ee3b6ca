//! 产品数据模型

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::core::error::{CoreError, CoreResult};

/// 产品记录
///
/// `name`/`price` 等核心字段为强类型，调用方额外提交的字段原样保存在 `extra` 中。
/// 可选字段显式提交的 `null` 也存放在 `extra`，输出时原样保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// 从 JSON 对象构造产品，字段类型不符时返回校验错误
    pub fn from_fields(mut fields: Map<String, Value>) -> CoreResult<Self> {
        check_field_types(&fields)?;

        let nulls: Vec<String> = FIELD_RULES
            .iter()
            .filter(|&&(key, _, required)| {
                !required && fields.get(key).is_some_and(Value::is_null)
            })
            .map(|&(key, _, _)| key.to_string())
            .collect();
        for key in &nulls {
            fields.remove(key);
        }

        let mut product: Product = serde_json::from_value(Value::Object(fields))
            .map_err(|_| CoreError::Validation("Invalid product fields".to_string()))?;
        for key in nulls {
            product.extra.insert(key, Value::Null);
        }

        Ok(product)
    }

    /// 转换为 JSON 对象，用于字段级合并
    pub fn into_fields(self) -> CoreResult<Map<String, Value>> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CoreError::Server("Something went wrong".to_string())),
            Err(e) => Err(CoreError::Server(e.to_string())),
        }
    }

    /// 浅合并：提交的字段覆盖同名字段，未提交的字段保留
    ///
    /// 请求体中的 `id` 同样会覆盖原值。
    pub fn merged_with(self, patch: Map<String, Value>) -> CoreResult<Self> {
        let mut fields = self.into_fields()?;
        fields.extend(patch);
        Self::from_fields(fields)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == category.to_lowercase())
    }

    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldType {
    Text,
    Numeric,
    Flag,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Text => value.is_string(),
            FieldType::Numeric => value.is_number(),
            FieldType::Flag => value.is_boolean(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldType::Text => "a string",
            FieldType::Numeric => "a number",
            FieldType::Flag => "a boolean",
        }
    }
}

/// 核心字段：(名称, 类型, 是否必填)
const FIELD_RULES: [(&str, FieldType, bool); 6] = [
    ("id", FieldType::Text, true),
    ("name", FieldType::Text, true),
    ("price", FieldType::Numeric, true),
    ("description", FieldType::Text, false),
    ("category", FieldType::Text, false),
    ("inStock", FieldType::Flag, false),
];

fn check_field_types(fields: &Map<String, Value>) -> CoreResult<()> {
    for (key, ty, required) in FIELD_RULES {
        match fields.get(key) {
            None if required => {
                return Err(CoreError::Validation(format!("'{}' is required", key)))
            }
            None => {}
            Some(Value::Null) if !required => {}
            Some(value) if ty.matches(value) => {}
            Some(_) => {
                return Err(CoreError::Validation(format!(
                    "'{}' must be {}",
                    key,
                    ty.describe()
                )))
            }
        }
    }
    Ok(())
}

/// 经过校验中间件解析后的请求体
#[derive(Debug, Clone)]
pub struct ProductPayload(pub Map<String, Value>);

impl ProductPayload {
    /// `name` 与 `price` 都存在且为真值
    pub fn has_required_fields(&self) -> bool {
        ["name", "price"]
            .iter()
            .all(|key| self.0.get(*key).is_some_and(is_truthy))
    }
}

/// 按 JavaScript 语义判断 JSON 值是否为真值
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 列表查询参数，数值字段保持原始字符串以便宽松解析
#[derive(Debug, Default)]
pub struct ListQuery {
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    /// 重复出现的参数取第一个值
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            category: first_value(pairs, "category"),
            page: first_value(pairs, "page"),
            limit: first_value(pairs, "limit"),
        }
    }
}

/// 搜索查询参数
#[derive(Debug, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
}

impl SearchQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            name: first_value(pairs, "name"),
        }
    }
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// 分类统计结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: usize,
    pub count_by_category: std::collections::BTreeMap<String, usize>,
}
