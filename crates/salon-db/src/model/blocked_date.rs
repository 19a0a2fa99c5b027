use chrono::NaiveDate;
use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Stored blackout. `start_minute`/`end_minute` are set only when
/// `all_day` is false.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::blocked_date)]
#[diesel(check_for_backend(Pg))]
pub struct BlockedDateRow {
    pub id: uuid::Uuid,
    pub day_of_week: Option<i16>,
    pub specific_date: Option<NaiveDate>,
    pub all_day: bool,
    pub start_minute: Option<i16>,
    pub end_minute: Option<i16>,
    pub reason: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::blocked_date)]
pub struct NewBlockedDate<'a> {
    pub id: uuid::Uuid,
    pub day_of_week: Option<i16>,
    pub specific_date: Option<NaiveDate>,
    pub all_day: bool,
    pub start_minute: Option<i16>,
    pub end_minute: Option<i16>,
    pub reason: &'a str,
    pub active: bool,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::blocked_date)]
#[diesel(treat_none_as_null = true)]
pub struct BlockedDateChanges<'a> {
    pub day_of_week: Option<i16>,
    pub specific_date: Option<NaiveDate>,
    pub all_day: bool,
    pub start_minute: Option<i16>,
    pub end_minute: Option<i16>,
    pub reason: &'a str,
    pub active: bool,
}
