use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 公文方向
    #[ts(export, export_to = "../frontend/src/types/generated/letter.ts")]
    pub enum LetterType ("公文类型") {
        Incoming => "incoming",
        Outgoing => "outgoing",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/letter.ts")]
    pub enum LetterStatus ("公文状态") {
        Pending => "pending",
        Processed => "processed",
        Archived => "archived",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/letter.ts")]
pub struct Letter {
    pub id: i64,
    pub school_id: i64,
    pub letter_number: String,
    pub letter_type: LetterType,
    pub subject: String,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub date: String,
    pub file_url: Option<String>,
    pub status: LetterStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/letter.ts")]
pub struct CreateLetterRequest {
    pub letter_number: String,
    pub letter_type: LetterType,
    pub subject: String,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub date: String,
    pub file_url: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/letter.ts")]
pub struct LetterListResponse {
    pub items: Vec<Letter>,
}
