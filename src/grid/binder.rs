//! Maps the generic row x slot grid onto a concrete view.
//!
//! The day view shows one row per user for a single date; the month view
//! shows one row per day for a single user. This is the only place that
//! turns a row index into an [`OwnerKey`].

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{GridError, GridResult};
use crate::models::event::{Event, OwnerKey, UserId};
use crate::models::row::{day_rows, user_rows, RowDescriptor, User};
use crate::services::store::EventFilter;
use crate::utils::date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Day,
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ViewMode {
    Day { users: Vec<User> },
    Month { user_id: UserId },
}

#[derive(Debug, Clone)]
pub struct ViewBinder {
    mode: ViewMode,
    date: NaiveDate,
    rows: Vec<RowDescriptor>,
}

impl ViewBinder {
    /// Users x slots for one date.
    pub fn day(users: Vec<User>, date: NaiveDate) -> Self {
        let mut binder = Self {
            mode: ViewMode::Day { users },
            date,
            rows: Vec::new(),
        };
        binder.rebuild_rows();
        binder
    }

    /// Days x slots for one user; `date` picks the month.
    pub fn month(user_id: impl Into<UserId>, date: NaiveDate) -> Self {
        let mut binder = Self {
            mode: ViewMode::Month {
                user_id: user_id.into(),
            },
            date,
            rows: Vec::new(),
        };
        binder.rebuild_rows();
        binder
    }

    pub fn kind(&self) -> ViewKind {
        match self.mode {
            ViewMode::Day { .. } => ViewKind::Day,
            ViewMode::Month { .. } => ViewKind::Month,
        }
    }

    /// The selected date; in the month view only its month matters.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn rows(&self) -> &[RowDescriptor] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// User whose month is shown.
    pub fn month_user(&self) -> Option<&str> {
        match &self.mode {
            ViewMode::Month { user_id } => Some(user_id),
            ViewMode::Day { .. } => None,
        }
    }

    pub fn owner_for_row(&self, row: usize) -> GridResult<OwnerKey> {
        match (&self.mode, self.rows.get(row)) {
            (ViewMode::Day { .. }, Some(RowDescriptor::User { id, .. })) => {
                Ok(OwnerKey::new(id.clone(), self.date))
            }
            (ViewMode::Month { user_id }, Some(RowDescriptor::Day { date, .. })) => {
                Ok(OwnerKey::new(user_id.clone(), *date))
            }
            _ => Err(GridError::UnknownRow(row)),
        }
    }

    /// Row an owner key maps to, if it is visible.
    pub fn row_for_owner(&self, owner: &OwnerKey) -> Option<usize> {
        match &self.mode {
            ViewMode::Day { .. } => {
                if owner.date != self.date {
                    return None;
                }
                self.rows.iter().position(|row| {
                    matches!(row, RowDescriptor::User { id, .. } if *id == owner.user_id)
                })
            }
            ViewMode::Month { user_id } => {
                if owner.user_id != *user_id {
                    return None;
                }
                self.rows.iter().position(|row| {
                    matches!(row, RowDescriptor::Day { date, .. } if *date == owner.date)
                })
            }
        }
    }

    pub fn row_for_event(&self, event: &Event) -> Option<usize> {
        self.row_for_owner(&event.owner)
    }

    /// Subscription filter for what is on screen.
    pub fn filter(&self) -> EventFilter {
        match &self.mode {
            ViewMode::Day { .. } => {
                let owners = self
                    .rows
                    .iter()
                    .filter_map(|row| match row {
                        RowDescriptor::User { id, .. } => Some(id.clone()),
                        RowDescriptor::Day { .. } => None,
                    })
                    .collect();
                EventFilter::day(owners, self.date)
            }
            ViewMode::Month { user_id } => {
                EventFilter::month(user_id.clone(), self.date.year(), self.date.month())
            }
        }
    }

    /// Whether two dates show the same rows.
    fn same_page(&self, other: NaiveDate) -> bool {
        match self.kind() {
            ViewKind::Day => self.date == other,
            ViewKind::Month => {
                self.date.year() == other.year() && self.date.month() == other.month()
            }
        }
    }

    /// Select a date. Returns whether the row mapping changed.
    pub fn set_date(&mut self, date: NaiveDate) -> bool {
        let changed = !self.same_page(date);
        self.date = date;
        if changed {
            self.rebuild_rows();
        }
        changed
    }

    /// Replace the user list of the day view.
    pub fn set_users(&mut self, users: Vec<User>) -> bool {
        match &mut self.mode {
            ViewMode::Day { users: current } if *current != users => {
                *current = users;
                self.rebuild_rows();
                true
            }
            _ => false,
        }
    }

    /// Change whose month is shown.
    pub fn set_month_user(&mut self, user_id: impl Into<UserId>) -> bool {
        let user_id = user_id.into();
        match &mut self.mode {
            ViewMode::Month { user_id: current } if *current != user_id => {
                *current = user_id;
                true
            }
            _ => false,
        }
    }

    pub fn switch_to_day(&mut self, users: Vec<User>) -> bool {
        if self.kind() == ViewKind::Day {
            return self.set_users(users);
        }
        self.mode = ViewMode::Day { users };
        self.rebuild_rows();
        true
    }

    pub fn switch_to_month(&mut self, user_id: impl Into<UserId>) -> bool {
        if self.kind() == ViewKind::Month {
            return self.set_month_user(user_id);
        }
        self.mode = ViewMode::Month {
            user_id: user_id.into(),
        };
        self.rebuild_rows();
        true
    }

    /// One page back: the previous day or the previous month.
    pub fn previous(&mut self) -> bool {
        let target = match self.kind() {
            ViewKind::Day => date::previous_day(self.date),
            ViewKind::Month => date::shift_months(self.date, -1),
        };
        self.set_date(target)
    }

    pub fn next(&mut self) -> bool {
        let target = match self.kind() {
            ViewKind::Day => date::next_day(self.date),
            ViewKind::Month => date::shift_months(self.date, 1),
        };
        self.set_date(target)
    }

    pub fn today(&mut self) -> bool {
        self.set_date(Local::now().date_naive())
    }

    /// Page title, e.g. `2025-03-14 (Fri)` or `2025-03`.
    pub fn title(&self) -> String {
        match self.kind() {
            ViewKind::Day => self.date.format("%Y-%m-%d (%a)").to_string(),
            ViewKind::Month => self.date.format("%Y-%m").to_string(),
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows = match &self.mode {
            ViewMode::Day { users } => user_rows(users),
            ViewMode::Month { .. } => day_rows(self.date.year(), self.date.month()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::FilterScope;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn users() -> Vec<User> {
        vec![
            User::new("u2", "Bob", 2),
            User::new("u1", "Alice", 1),
            User::new("u3", "Carol", 3),
        ]
    }

    #[test]
    fn test_day_rows_map_to_users_on_selected_date() {
        let binder = ViewBinder::day(users(), ymd(2025, 3, 14));
        assert_eq!(binder.row_count(), 3);
        assert_eq!(
            binder.owner_for_row(1).unwrap(),
            OwnerKey::new("u2", ymd(2025, 3, 14))
        );
        assert!(matches!(
            binder.owner_for_row(3),
            Err(GridError::UnknownRow(3))
        ));
    }

    #[test]
    fn test_month_rows_map_to_dates_for_fixed_user() {
        let binder = ViewBinder::month("u1", ymd(2025, 2, 10));
        assert_eq!(binder.row_count(), 28);
        assert_eq!(
            binder.owner_for_row(0).unwrap(),
            OwnerKey::new("u1", ymd(2025, 2, 1))
        );
        assert_eq!(
            binder.owner_for_row(27).unwrap(),
            OwnerKey::new("u1", ymd(2025, 2, 28))
        );
    }

    #[test]
    fn test_row_for_owner_inverts_mapping() {
        let day = ViewBinder::day(users(), ymd(2025, 3, 14));
        for row in 0..day.row_count() {
            assert_eq!(day.row_for_owner(&day.owner_for_row(row).unwrap()), Some(row));
        }
        assert_eq!(day.row_for_owner(&OwnerKey::new("u1", ymd(2025, 3, 15))), None);

        let month = ViewBinder::month("u1", ymd(2025, 3, 1));
        assert_eq!(month.row_for_owner(&OwnerKey::new("u1", ymd(2025, 3, 20))), Some(19));
        assert_eq!(month.row_for_owner(&OwnerKey::new("u2", ymd(2025, 3, 20))), None);
    }

    #[test]
    fn test_filters() {
        let day = ViewBinder::day(users(), ymd(2025, 3, 14));
        let filter = day.filter();
        assert_eq!(filter.owner_ids, vec!["u1", "u2", "u3"]);
        assert_eq!(filter.scope, FilterScope::Day(ymd(2025, 3, 14)));

        let month = ViewBinder::month("u1", ymd(2025, 3, 14));
        assert_eq!(
            month.filter().scope,
            FilterScope::Month { year: 2025, month: 3 }
        );
    }

    #[test]
    fn test_set_date_reports_mapping_change() {
        let mut month = ViewBinder::month("u1", ymd(2025, 3, 14));
        assert!(!month.set_date(ymd(2025, 3, 20)), "same month keeps rows");
        assert!(month.set_date(ymd(2025, 4, 1)));
        assert_eq!(month.row_count(), 30);

        let mut day = ViewBinder::day(users(), ymd(2025, 3, 14));
        assert!(!day.set_date(ymd(2025, 3, 14)));
        assert!(day.set_date(ymd(2025, 3, 15)));
    }

    #[test]
    fn test_navigation() {
        let mut day = ViewBinder::day(users(), ymd(2025, 3, 1));
        day.previous();
        assert_eq!(day.date(), ymd(2025, 2, 28));

        let mut month = ViewBinder::month("u1", ymd(2025, 12, 31));
        month.next();
        assert_eq!(month.date(), ymd(2026, 1, 31));
        assert_eq!(month.title(), "2026-01");
    }

    #[test]
    fn test_switching_views() {
        let mut binder = ViewBinder::day(users(), ymd(2025, 3, 14));
        assert!(binder.switch_to_month("u3"));
        assert_eq!(binder.kind(), ViewKind::Month);
        assert_eq!(binder.month_user(), Some("u3"));
        assert!(!binder.switch_to_month("u3"));
        assert!(binder.set_month_user("u1"));

        assert!(binder.switch_to_day(users()));
        assert_eq!(binder.row_count(), 3);
        assert!(!binder.set_users(users()));
    }
}
