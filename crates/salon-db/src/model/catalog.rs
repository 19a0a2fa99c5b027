use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// A bookable salon service. Only the fields booking needs are mapped.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::salon_service)]
#[diesel(check_for_backend(Pg))]
pub struct SalonService {
    pub id: uuid::Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SalonService {
    /// Duration as a slot length, or `None` if the stored value is unusable.
    #[must_use]
    pub fn duration(&self) -> Option<u16> {
        u16::try_from(self.duration_minutes).ok().filter(|m| *m > 0)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::salon_service)]
pub struct NewSalonService<'a> {
    pub id: uuid::Uuid,
    pub name: &'a str,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub active: bool,
}
