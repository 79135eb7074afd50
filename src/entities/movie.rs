use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::models::Resolution;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    pub poster_url: Option<String>,
    #[sea_orm(column_name = "file_480p")]
    pub file_480p: Option<String>,
    #[sea_orm(column_name = "file_720p")]
    pub file_720p: Option<String>,
    #[sea_orm(column_name = "file_1080p")]
    pub file_1080p: Option<String>,
    /// Unix timestamp (seconds). Absent for rows written before the column existed.
    pub uploaded_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn file(&self, resolution: Resolution) -> Option<&str> {
        match resolution {
            Resolution::P480 => self.file_480p.as_deref(),
            Resolution::P720 => self.file_720p.as_deref(),
            Resolution::P1080 => self.file_1080p.as_deref(),
        }
    }
}
