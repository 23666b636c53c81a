use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, DbBackend, Value};

use super::CriteriaError;
use crate::entities::CurrentStatus;

/// A value that can appear on the right-hand side of a filter operation.
pub trait FilterValue: Clone + Into<Value> + Sized {
    fn parse_value(raw: &str) -> Result<Self, String>;
}

impl FilterValue for i64 {
    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|_| "expected an integer".to_string())
    }
}

impl FilterValue for i32 {
    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|_| "expected an integer".to_string())
    }
}

impl FilterValue for bool {
    fn parse_value(raw: &str) -> Result<Self, String> {
        parse_bool(raw)
    }
}

impl FilterValue for String {
    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FilterValue for DateTime<Utc> {
    fn parse_value(raw: &str) -> Result<Self, String> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| "expected an RFC 3339 timestamp".to_string())
    }
}

impl FilterValue for CurrentStatus {
    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| "expected one of ENABLED, DISABLED, DRAFT".to_string())
    }
}

pub(crate) fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

fn parse_one<T: FilterValue>(field: &str, raw: &str) -> Result<T, CriteriaError> {
    T::parse_value(raw).map_err(|reason| CriteriaError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        reason,
    })
}

fn parse_list<T: FilterValue>(field: &str, raw: &str) -> Result<Vec<T>, CriteriaError> {
    raw.split(',')
        .filter(|item| !item.is_empty())
        .map(|item| parse_one(field, item))
        .collect()
}

fn unsupported(field: &str, operation: &str) -> CriteriaError {
    CriteriaError::InvalidFilter {
        field: field.to_string(),
        operation: operation.to_string(),
    }
}

/// ANDs the fragments of one filter; `None` when the filter is empty.
fn all_of(parts: Vec<SimpleExpr>) -> Option<Condition> {
    if parts.is_empty() {
        return None;
    }
    Some(parts.into_iter().fold(Condition::all(), |cond, part| cond.add(part)))
}

/// Case-sensitive substring test. `LIKE` folds ASCII case on SQLite, so the
/// position functions are used instead.
pub(crate) fn substring_expr<C: ColumnTrait>(
    column: C,
    needle: &str,
    backend: DbBackend,
) -> SimpleExpr {
    let template = match backend {
        DbBackend::Postgres => "strpos($1, $2) > 0",
        DbBackend::Sqlite | DbBackend::MySql => "instr($1, $2) > 0",
    };
    Expr::cust_with_exprs(
        template,
        [
            SimpleExpr::from(Expr::col(column.as_column_ref())),
            SimpleExpr::from(Expr::val(needle.to_string())),
        ],
    )
}

/// Operations shared by every filter kind: equality, null-check and
/// membership. Enum and boolean filters are exactly this.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub specified: Option<bool>,
    pub in_list: Option<Vec<T>>,
    pub not_in_list: Option<Vec<T>>,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            specified: None,
            in_list: None,
            not_in_list: None,
        }
    }
}

pub type EnumFilter<E> = Filter<E>;
pub type BooleanFilter = Filter<bool>;

impl<T: FilterValue> Filter<T> {
    /// Records one `field.op=value` parameter. Returns `false` when `op` is
    /// not one of the shared operations so wrappers can try their own.
    fn accept(&mut self, field: &str, op: &str, raw: &str) -> Result<bool, CriteriaError> {
        match op {
            "equals" => self.equals = Some(parse_one(field, raw)?),
            "notEquals" => self.not_equals = Some(parse_one(field, raw)?),
            "specified" => {
                self.specified = Some(parse_bool(raw).map_err(|reason| {
                    CriteriaError::InvalidValue {
                        field: field.to_string(),
                        value: raw.to_string(),
                        reason,
                    }
                })?)
            }
            "in" => self
                .in_list
                .get_or_insert_with(Vec::new)
                .extend(parse_list(field, raw)?),
            "notIn" => self
                .not_in_list
                .get_or_insert_with(Vec::new)
                .extend(parse_list(field, raw)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn apply(&mut self, field: &str, op: &str, raw: &str) -> Result<(), CriteriaError> {
        if self.accept(field, op, raw)? {
            Ok(())
        } else {
            Err(unsupported(field, op))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not_equals.is_none()
            && self.specified.is_none()
            && self.in_list.is_none()
            && self.not_in_list.is_none()
    }

    fn push_parts<C: ColumnTrait>(&self, column: C, parts: &mut Vec<SimpleExpr>) {
        if let Some(value) = &self.equals {
            parts.push(column.eq(value.clone()));
        }
        if let Some(value) = &self.not_equals {
            parts.push(column.ne(value.clone()));
        }
        match self.specified {
            Some(true) => parts.push(column.is_not_null()),
            Some(false) => parts.push(column.is_null()),
            None => {}
        }
        if let Some(values) = &self.in_list {
            parts.push(column.is_in(values.iter().cloned()));
        }
        if let Some(values) = &self.not_in_list {
            parts.push(column.is_not_in(values.iter().cloned()));
        }
    }

    pub fn to_condition<C: ColumnTrait>(&self, column: C) -> Option<Condition> {
        let mut parts = Vec::new();
        self.push_parts(column, &mut parts);
        all_of(parts)
    }
}

/// Ordered comparisons on ids, counters and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    pub base: Filter<T>,
    pub greater_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than: Option<T>,
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            base: Filter::default(),
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: FilterValue> RangeFilter<T> {
    pub fn apply(&mut self, field: &str, op: &str, raw: &str) -> Result<(), CriteriaError> {
        if self.base.accept(field, op, raw)? {
            return Ok(());
        }
        let slot = match op {
            "greaterThan" => &mut self.greater_than,
            "greaterThanOrEqual" => &mut self.greater_than_or_equal,
            "lessThan" => &mut self.less_than,
            "lessThanOrEqual" => &mut self.less_than_or_equal,
            _ => return Err(unsupported(field, op)),
        };
        *slot = Some(parse_one(field, raw)?);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self.greater_than.is_none()
            && self.greater_than_or_equal.is_none()
            && self.less_than.is_none()
            && self.less_than_or_equal.is_none()
    }

    fn parts<C: ColumnTrait>(&self, column: C) -> Vec<SimpleExpr> {
        let mut parts = Vec::new();
        self.base.push_parts(column, &mut parts);
        if let Some(value) = &self.greater_than {
            parts.push(column.gt(value.clone()));
        }
        if let Some(value) = &self.greater_than_or_equal {
            parts.push(column.gte(value.clone()));
        }
        if let Some(value) = &self.less_than {
            parts.push(column.lt(value.clone()));
        }
        if let Some(value) = &self.less_than_or_equal {
            parts.push(column.lte(value.clone()));
        }
        parts
    }

    pub fn to_condition<C: ColumnTrait>(&self, column: C) -> Option<Condition> {
        all_of(self.parts(column))
    }

    /// Same filter with the null-check removed; join compilation handles
    /// `specified` separately.
    pub(crate) fn without_specified(&self) -> Self {
        let mut copy = self.clone();
        copy.base.specified = None;
        copy
    }
}

/// Where a string filter reads its value from. `Folded` routes substring
/// operations to a shadow column holding `transform(value)` and applies the
/// same transform to the needle.
#[derive(Clone, Copy)]
pub enum StringTarget<C> {
    Plain(C),
    Folded {
        column: C,
        folded: C,
        transform: fn(&str) -> String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringFilter {
    pub base: Filter<String>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    pub fn apply(&mut self, field: &str, op: &str, raw: &str) -> Result<(), CriteriaError> {
        if self.base.accept(field, op, raw)? {
            return Ok(());
        }
        match op {
            "contains" => self.contains = Some(raw.to_string()),
            "doesNotContain" => self.does_not_contain = Some(raw.to_string()),
            _ => return Err(unsupported(field, op)),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.contains.is_none() && self.does_not_contain.is_none()
    }

    pub fn to_condition<C: ColumnTrait>(
        &self,
        target: StringTarget<C>,
        backend: DbBackend,
    ) -> Option<Condition> {
        let (column, substring_column, transform): (C, C, Option<fn(&str) -> String>) =
            match target {
                StringTarget::Plain(column) => (column, column, None),
                StringTarget::Folded {
                    column,
                    folded,
                    transform,
                } => (column, folded, Some(transform)),
            };
        let needle = |raw: &str| match transform {
            Some(f) => f(raw),
            None => raw.to_string(),
        };

        let mut parts = Vec::new();
        self.base.push_parts(column, &mut parts);
        if let Some(raw) = &self.contains {
            parts.push(substring_expr(substring_column, &needle(raw), backend));
        }
        if let Some(raw) = &self.does_not_contain {
            parts.push(substring_expr(substring_column, &needle(raw), backend).not());
        }
        all_of(parts)
    }
}
