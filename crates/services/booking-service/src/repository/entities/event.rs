//! Event database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::Event;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub date: DateTimeUtc,
    pub location: String,
    pub capacity: i32,
    pub confirmed_count: i32,
    pub status: String,
    pub organizer_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Event {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Event {
            id: model.id,
            title: model.title,
            description: model.description,
            date: model.date,
            location: model.location,
            capacity: model.capacity,
            confirmed_count: model.confirmed_count,
            status: model
                .status
                .parse()
                .map_err(|e| AppError::internal(format!("Corrupt event row {}: {}", model.id, e)))?,
            organizer_id: model.organizer_id,
            created_at: model.created_at,
        })
    }
}
