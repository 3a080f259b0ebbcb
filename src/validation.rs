use std::collections::BTreeMap;
use std::fmt;

/// 字段级校验错误
///
/// 只在表单内部使用，不会作为 [`crate::error::ClientError`] 向上传播。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors<F: Ord> {
    fields: BTreeMap<F, String>,
}

impl<F: Ord + Copy> ValidationErrors<F> {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// 同一字段只保留第一条错误
    pub fn add(&mut self, field: F, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.fields.keys().copied()
    }

    /// 没有错误时返回 `Ok(value)`
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl<F: Ord + Copy> Default for ValidationErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Ord + fmt::Debug> fmt::Display for ValidationErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{:?}: {}", field, message)?;
        }
        Ok(())
    }
}
