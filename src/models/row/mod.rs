// Row module
// Lanes of the grid: people in the day view, calendar days in the month view

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::event::UserId;

/// A person that owns events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Persisted display order; lower sorts first.
    pub order: i64,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
        }
    }

    /// Validate the user
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("User id cannot be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("User name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// One row of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDescriptor {
    User {
        id: UserId,
        name: String,
        display_order: i64,
    },
    Day {
        day_of_month: u32,
        date: NaiveDate,
    },
}

impl RowDescriptor {
    pub fn for_user(user: &User) -> Self {
        RowDescriptor::User {
            id: user.id.clone(),
            name: user.name.clone(),
            display_order: user.order,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        RowDescriptor::Day {
            day_of_month: date.day(),
            date,
        }
    }

    /// Header label shown at the start of the row.
    pub fn label(&self) -> String {
        match self {
            RowDescriptor::User { name, .. } => name.clone(),
            RowDescriptor::Day { date, .. } => date.format("%-d (%a)").to_string(),
        }
    }

    /// Key rows are ordered by.
    pub fn sort_key(&self) -> i64 {
        match self {
            RowDescriptor::User { display_order, .. } => *display_order,
            RowDescriptor::Day { day_of_month, .. } => *day_of_month as i64,
        }
    }
}

/// Day-view rows for users, sorted by persisted order.
pub fn user_rows(users: &[User]) -> Vec<RowDescriptor> {
    let mut sorted: Vec<&User> = users.iter().collect();
    sorted.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    sorted.into_iter().map(RowDescriptor::for_user).collect()
}

/// Month-view rows, one per day of the month.
pub fn day_rows(year: i32, month: u32) -> Vec<RowDescriptor> {
    crate::utils::date::days_of_month(year, month)
        .into_iter()
        .map(RowDescriptor::for_date)
        .collect()
}
