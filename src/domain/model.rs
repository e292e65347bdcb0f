use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const USER_LIST_ID_KEY: &str = "userListId";
pub const SHORT_ID_KEY: &str = "shortId";

/// 依原始順序排列、已正規化的基因符號清單
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneList {
    symbols: Vec<String>,
}

impl GeneList {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Enrichr 回傳的清單 ID；服務端以數字回傳，但也接受字串形式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListId(String);

impl UserListId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserListId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for UserListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `POST /addList` 的回應，保留原始 JSON 物件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionResponse {
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl SubmissionResponse {
    pub fn from_json(body: &str) -> crate::utils::error::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn user_list_id(&self) -> Option<UserListId> {
        match self.fields.get(USER_LIST_ID_KEY)? {
            serde_json::Value::Number(n) => Some(UserListId(n.to_string())),
            serde_json::Value::String(s) if !s.trim().is_empty() => {
                Some(UserListId(s.trim().to_string()))
            }
            _ => None,
        }
    }

    pub fn short_id(&self) -> Option<&str> {
        self.fields
            .get(SHORT_ID_KEY)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

/// `GET /view?userListId=` 的回應
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResponse {
    pub genes: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    UserListId,
    ShortId,
    RoundTrip,
}

impl Check {
    pub const ALL: [Check; 3] = [Check::UserListId, Check::ShortId, Check::RoundTrip];

    pub fn name(&self) -> &'static str {
        match self {
            Check::UserListId => "user-list-id",
            Check::ShortId => "short-id",
            Check::RoundTrip => "round-trip",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Check {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Check::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| {
                format!(
                    "unknown check '{}', expected one of: user-list-id, short-id, round-trip",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    /// 斷言失敗
    Failed,
    /// setup 或網路錯誤，斷言未執行
    Errored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub check: Check,
    pub status: CheckStatus,
    pub detail: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            started_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: CheckOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcome(&self, check: Check) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.check == check)
    }

    /// 尚未執行的檢查
    pub fn missing_checks(&self) -> Vec<Check> {
        Check::ALL
            .into_iter()
            .filter(|c| self.outcome(*c).is_none())
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status != CheckStatus::Passed)
    }

    /// 全部檢查都有結果且都通過才算成功；未執行的檢查不會被當成通過
    pub fn is_complete_pass(&self) -> bool {
        self.missing_checks().is_empty() && self.failures().next().is_none()
    }

    pub fn to_json(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
