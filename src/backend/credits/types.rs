use serde::Serialize;

/// Credits charged for creating a page with AI
pub const PAGE_CREATION_COST: f64 = 2.0;
/// Credits charged for an AI edit
pub const PAGE_EDIT_COST: f64 = 1.4;
/// Credits charged for importing a template
pub const TEMPLATE_IMPORT_COST: f64 = 1.0;

/// Ledger entry type stored in `credit_transactions.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditAction {
    PageCreation,
    PageEdit,
    TemplateImport,
}

impl CreditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageCreation => "PAGE_CREATION",
            Self::PageEdit => "PAGE_EDIT",
            Self::TemplateImport => "TEMPLATE_IMPORT",
        }
    }

    /// Action name the dashboard shows in credit dialogs
    pub fn label(&self) -> &'static str {
        match self {
            Self::PageCreation => "criação",
            Self::PageEdit => "edição",
            Self::TemplateImport => "importação",
        }
    }

    pub fn cost(&self) -> f64 {
        match self {
            Self::PageCreation => PAGE_CREATION_COST,
            Self::PageEdit => PAGE_EDIT_COST,
            Self::TemplateImport => TEMPLATE_IMPORT_COST,
        }
    }
}

/// A user's plan joined with its definition
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserPlan {
    pub user_id: String,
    pub status: String,
    pub credits_available: f64,
    pub credits_used: f64,
    pub custom_domains_used: i32,
    pub plan_name: Option<String>,
    pub can_create_pages: Option<bool>,
    pub custom_domains_limit: Option<i32>,
    pub pwa_enabled: Option<bool>,
}

impl UserPlan {
    pub fn is_active(&self) -> bool {
        self.status == "ACTIVE"
    }

    pub fn is_free(&self) -> bool {
        self.plan_name.as_deref() == Some("Free")
    }

    pub fn can_afford(&self, required: f64) -> bool {
        self.is_active() && self.credits_available >= required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditState {
    NoPlan,
    NoCredits,
    SufficientCredits,
}

impl CreditState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPlan => "NO_PLAN",
            Self::NoCredits => "NO_CREDITS",
            Self::SufficientCredits => "SUFFICIENT_CREDITS",
        }
    }
}

/// What the dashboard needs to pick between the upgrade and top-up dialogs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditStatus {
    pub has_credits: bool,
    pub has_active_plan: bool,
    pub is_free_plan: bool,
    pub available_credits: f64,
    pub required_credits: f64,
    pub plan_name: String,
    pub status: CreditState,
    pub message: String,
}

impl CreditStatus {
    /// Classify a (possibly missing) plan against a required amount
    pub fn evaluate(plan: Option<&UserPlan>, required: f64) -> Self {
        let Some(plan) = plan else {
            return Self::no_plan(required, "None", "User has no active plan");
        };

        let plan_name = plan.plan_name.clone().unwrap_or_else(|| "Unknown".to_string());

        if !plan.is_active() {
            return Self {
                has_credits: false,
                has_active_plan: false,
                is_free_plan: plan.is_free(),
                available_credits: plan.credits_available,
                required_credits: required,
                plan_name,
                status: CreditState::NoPlan,
                message: "Plan is not active".to_string(),
            };
        }

        let enough = plan.credits_available >= required;
        Self {
            has_credits: enough,
            has_active_plan: true,
            is_free_plan: plan.is_free(),
            available_credits: plan.credits_available,
            required_credits: required,
            plan_name,
            status: if enough {
                CreditState::SufficientCredits
            } else {
                CreditState::NoCredits
            },
            message: if enough {
                "Sufficient credits".to_string()
            } else {
                format!(
                    "Insufficient credits. Available: {}, required: {}",
                    plan.credits_available, required
                )
            },
        }
    }

    /// Status used when the plan could not be read
    pub fn no_plan(required: f64, plan_name: &str, message: &str) -> Self {
        Self {
            has_credits: false,
            has_active_plan: false,
            is_free_plan: true,
            available_credits: 0.0,
            required_credits: required,
            plan_name: plan_name.to_string(),
            status: CreditState::NoPlan,
            message: message.to_string(),
        }
    }

    /// Colon-delimited stream error the dashboard splits field by field:
    /// `INSUFFICIENT_CREDITS:{required}:{action}:{status}:{hasActivePlan}:{isFreePlan}:{planName}:{availableCredits}`
    pub fn stream_error(&self, action: CreditAction) -> String {
        format!(
            "INSUFFICIENT_CREDITS:{}:{}:{}:{}:{}:{}:{}",
            self.required_credits,
            action.label(),
            self.status.as_str(),
            self.has_active_plan,
            self.is_free_plan,
            self.plan_name,
            self.available_credits
        )
    }

    /// Fields sent alongside an `INSUFFICIENT_CREDITS` stream error
    pub fn details(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// Result of a consumption attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<f64>,
}

impl ConsumeResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            new_balance: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPermission {
    pub has_active_plan: bool,
    pub can_create_pages: bool,
    /// -1 means unlimited
    pub custom_domains_limit: i32,
    pub custom_domains_used: i32,
    pub can_create_more_domains: bool,
    pub pwa_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_available: Option<f64>,
}

impl From<&UserPlan> for PlanPermission {
    fn from(plan: &UserPlan) -> Self {
        let limit = plan.custom_domains_limit.unwrap_or(0);
        Self {
            has_active_plan: plan.is_active(),
            can_create_pages: plan.credits_available > 0.0,
            custom_domains_limit: limit,
            custom_domains_used: plan.custom_domains_used,
            can_create_more_domains: limit == -1 || plan.custom_domains_used < limit,
            pwa_enabled: plan.pwa_enabled.unwrap_or(false),
            credits_available: Some(plan.credits_available),
        }
    }
}
