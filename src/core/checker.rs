use crate::core::genes::parse_gene_file;
use crate::core::poll::poll_until;
use crate::core::{Check, CheckOutcome, CheckReport, CheckStatus, ConfigProvider, EnrichrApi, Storage};
use crate::domain::model::{GeneList, SubmissionResponse, UserListId, SHORT_ID_KEY, USER_LIST_ID_KEY};
use crate::utils::error::{CheckError, ErrorCategory, Result};
use std::time::Instant;

/// 一次 setup 的產物：送出的基因清單與服務端回應
#[derive(Debug, Clone)]
pub struct Submission {
    pub input_genes: GeneList,
    pub response: SubmissionResponse,
}

/// 送出基因清單並驗證 Enrichr 回應的檢查器。
///
/// 每個檢查都會重新執行 setup（讀檔、POST），彼此不共用狀態。
pub struct SubmissionChecker<S: Storage, A: EnrichrApi, C: ConfigProvider> {
    storage: S,
    api: A,
    config: C,
}

impl<S: Storage, A: EnrichrApi, C: ConfigProvider> SubmissionChecker<S, A, C> {
    pub fn new(storage: S, api: A, config: C) -> Self {
        Self {
            storage,
            api,
            config,
        }
    }

    pub async fn read_genes(&self) -> Result<GeneList> {
        let data = self.storage.read_file(self.config.genes_file()).await?;
        parse_gene_file(&data)
    }

    /// setup：讀取基因檔並 POST 到 `/addList`
    pub async fn submit(&self) -> Result<Submission> {
        let input_genes = self.read_genes().await?;
        tracing::debug!(
            "🧬 Read {} genes from {}",
            input_genes.len(),
            self.config.genes_file()
        );

        let response = self
            .api
            .add_list(&input_genes, self.config.description())
            .await?;

        Ok(Submission {
            input_genes,
            response,
        })
    }

    pub fn check_user_list_id(submission: &Submission) -> Result<UserListId> {
        submission
            .response
            .user_list_id()
            .ok_or_else(|| CheckError::MissingFieldError {
                field: USER_LIST_ID_KEY.to_string(),
            })
    }

    pub fn check_short_id(submission: &Submission) -> Result<String> {
        submission
            .response
            .short_id()
            .map(str::to_string)
            .ok_or_else(|| CheckError::MissingFieldError {
                field: SHORT_ID_KEY.to_string(),
            })
    }

    /// 等清單可查詢後取回，並與送出的清單逐項比對（順序必須一致）
    pub async fn check_round_trip(&self, submission: &Submission) -> Result<Vec<String>> {
        let user_list_id = Self::check_user_list_id(submission)?;
        let policy = self.config.poll_policy();

        let api = &self.api;
        let id = &user_list_id;
        let view = poll_until(&policy, user_list_id.as_str(), move || api.view_list(id)).await?;

        let expected = submission.input_genes.symbols();
        if view.genes != expected {
            return Err(CheckError::RoundTripMismatch {
                expected: expected.to_vec(),
                actual: view.genes,
            });
        }

        Ok(view.genes)
    }

    async fn evaluate(&self, check: Check, submission: &Submission) -> Result<String> {
        match check {
            Check::UserListId => {
                Self::check_user_list_id(submission).map(|id| format!("userListId={}", id))
            }
            Check::ShortId => Self::check_short_id(submission).map(|id| format!("shortId={}", id)),
            Check::RoundTrip => self
                .check_round_trip(submission)
                .await
                .map(|genes| format!("{} genes round-tripped", genes.len())),
        }
    }

    /// 執行單一檢查。讀取基因檔失敗會直接往上傳，其餘錯誤記錄在結果中。
    pub async fn run_check(&self, check: Check) -> Result<CheckOutcome> {
        let started = Instant::now();
        tracing::info!("🔎 Running check: {}", check);

        let result = match self.submit().await {
            Ok(submission) => self.evaluate(check, &submission).await,
            Err(e) => Err(e),
        };

        let (status, detail) = match result {
            Ok(detail) => {
                tracing::info!("✅ {} passed ({})", check, detail);
                (CheckStatus::Passed, Some(detail))
            }
            Err(e) if e.category() == ErrorCategory::Io => return Err(e),
            Err(e) if e.is_assertion() => {
                tracing::warn!("❌ {} failed: {}", check, e);
                (CheckStatus::Failed, Some(e.to_string()))
            }
            Err(e) => {
                tracing::error!("💥 {} errored: {}", check, e);
                tracing::error!("💡 {}", e.recovery_suggestion());
                (CheckStatus::Errored, Some(e.to_string()))
            }
        };

        Ok(CheckOutcome {
            check,
            status,
            detail,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    pub async fn run(&self, checks: &[Check]) -> Result<CheckReport> {
        let mut report = CheckReport::new(self.config.base_url());
        for check in checks {
            let outcome = self.run_check(*check).await?;
            report.record(outcome);
        }

        let missing = report.missing_checks();
        if !missing.is_empty() {
            tracing::warn!("⚠️ Checks not run: {:?}", missing);
        }

        Ok(report)
    }

    pub async fn run_all(&self) -> Result<CheckReport> {
        self.run(&Check::ALL).await
    }
}
