use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{registrations, users, workshops};

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = workshops)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub time: String,
    pub meeting_link: String,
    pub description: String,
    pub instructor: String,
    pub material: Option<String>,
}

/// Descriptive fields of a workshop as written by an administrator.
///
/// Used for both inserts and updates. On update a `None` material keeps the
/// reference that is already stored.
#[derive(Insertable, AsChangeset, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = workshops)]
pub struct WorkshopDraft {
    pub name: String,
    pub date: String,
    pub time: String,
    pub meeting_link: String,
    pub description: String,
    pub instructor: String,
    pub material: Option<String>,
}

impl WorkshopDraft {
    #[must_use]
    pub fn into_workshop(self, id: i64) -> Workshop {
        Workshop {
            id,
            name: self.name,
            date: self.date,
            time: self.time,
            meeting_link: self.meeting_link,
            description: self.description,
            instructor: self.instructor,
            material: self.material,
        }
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub username: String,
    pub email: String,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    pub workshop_id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = registrations)]
pub struct NewRegistration {
    pub workshop_id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub workshop_id: i64,
    pub username: String,
    pub present: bool,
}
