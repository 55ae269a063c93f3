//! Guest entity.
//!
//! One row per invited person. The (`first_name`, `last_name`) pair is
//! unique and doubles as the guest login lookup key; `rsvp_token` is the
//! sole credential for the anonymous RSVP page.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guest model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guest")]
pub struct Model {
    /// System-assigned, immutable ID.
    #[sea_orm(primary_key)]
    pub id: i32,

    pub first_name: String,

    pub last_name: String,

    #[sea_orm(nullable)]
    pub email: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    /// Wedding-party member flag (display only, no access control).
    #[sea_orm(default_value = false)]
    pub bridal_party: bool,

    /// Invitation-list provenance: NZ side.
    #[sea_orm(default_value = false)]
    pub nz_invite: bool,

    /// Invitation-list provenance: Malaysia side.
    #[sea_orm(default_value = false)]
    pub my_invite: bool,

    /// Reception/dinner access tier.
    #[sea_orm(default_value = false)]
    pub dinner: bool,

    /// Tri-state response: `None` = not yet responded, `Some(true)` =
    /// attending, `Some(false)` = declined. Never reverts to `None`
    /// after a response.
    #[sea_orm(nullable)]
    pub rsvp: Option<bool>,

    /// Names of additional attendees, free text.
    #[sea_orm(nullable)]
    pub rsvp_others_yes: Option<String>,

    /// Names of additional non-attendees, free text.
    #[sea_orm(nullable)]
    pub rsvp_others_no: Option<String>,

    /// Timestamp of the last RSVP submission.
    #[sea_orm(nullable)]
    pub rsvp_date: Option<DateTime<Utc>>,

    /// 24-hex-char capability token for the anonymous RSVP page.
    /// Nullable so legacy rows can be backfilled; always set on create.
    #[sea_orm(unique, nullable)]
    pub rsvp_token: Option<String>,

    /// Set when the guest record is provisioned/invited.
    #[sea_orm(nullable)]
    pub invited_at: Option<DateTime<Utc>>,

    /// Set the first time the RSVP page is loaded for this guest's
    /// token. First-view-wins: never overwritten once set.
    #[sea_orm(nullable)]
    pub rsvp_viewed_at: Option<DateTime<Utc>>,

    /// Seating assignment.
    #[sea_orm(nullable)]
    pub table_number: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
