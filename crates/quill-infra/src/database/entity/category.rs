//! Category entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category_post::Entity")]
    CategoryPost,
}

impl Related<super::category_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryPost.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_post::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_post::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Category.
impl From<Model> for quill_core::domain::Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Category to SeaORM ActiveModel.
impl From<quill_core::domain::Category> for ActiveModel {
    fn from(category: quill_core::domain::Category) -> Self {
        Self {
            id: Set(category.id),
            name: Set(category.name),
            is_active: Set(category.is_active),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
        }
    }
}
