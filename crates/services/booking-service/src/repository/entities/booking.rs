//! Booking database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::Booking;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Booking {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: model.id,
            event_id: model.event_id,
            participant_id: model.participant_id,
            status: model.status.parse().map_err(|e| {
                AppError::internal(format!("Corrupt booking row {}: {}", model.id, e))
            })?,
            created_at: model.created_at,
        })
    }
}
