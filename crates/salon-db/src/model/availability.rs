use chrono::NaiveDate;
use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Stored availability rule. Exactly one of `day_of_week` and
/// `specific_date` is set; times are minutes after midnight.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::availability_rule)]
#[diesel(check_for_backend(Pg))]
pub struct AvailabilityRuleRow {
    pub id: uuid::Uuid,
    pub day_of_week: Option<i16>,
    pub specific_date: Option<NaiveDate>,
    pub all_day: bool,
    pub start_minute: i16,
    pub end_minute: i16,
    pub slot_minutes: i16,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for creating availability rules
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::availability_rule)]
pub struct NewAvailabilityRule<'a> {
    pub id: uuid::Uuid,
    pub day_of_week: Option<i16>,
    pub specific_date: Option<NaiveDate>,
    pub all_day: bool,
    pub start_minute: i16,
    pub end_minute: i16,
    pub slot_minutes: i16,
    pub active: bool,
    pub notes: Option<&'a str>,
}

/// Full rewrite of a rule's mutable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::availability_rule)]
#[diesel(treat_none_as_null = true)]
pub struct AvailabilityRuleChanges<'a> {
    pub day_of_week: Option<i16>,
    pub specific_date: Option<NaiveDate>,
    pub all_day: bool,
    pub start_minute: i16,
    pub end_minute: i16,
    pub slot_minutes: i16,
    pub active: bool,
    pub notes: Option<&'a str>,
}
