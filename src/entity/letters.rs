//! 公文实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "letters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub letter_number: String,
    pub letter_type: String,
    pub subject: String,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub date: String,
    pub file_url: Option<String>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_letter(self) -> crate::models::letters::Letter {
        use crate::models::letters::{Letter, LetterStatus, LetterType};
        use chrono::{DateTime, Utc};

        Letter {
            id: self.id,
            school_id: self.school_id,
            letter_number: self.letter_number,
            letter_type: self
                .letter_type
                .parse::<LetterType>()
                .unwrap_or(LetterType::Incoming),
            subject: self.subject,
            sender: self.sender,
            recipient: self.recipient,
            date: self.date,
            file_url: self.file_url,
            status: self
                .status
                .parse::<LetterStatus>()
                .unwrap_or(LetterStatus::Pending),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
