use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub part_number: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    /// Price in minor currency units.
    pub unit_price: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work_order_parts::Entity")]
    WorkOrderParts,
}

impl Related<super::work_order_parts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrderParts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
