//! Domain models for Fintrack

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a transaction adds to or subtracts from the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed set of transaction categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Salary,
    Investment,
    Food,
    Transportation,
    Housing,
    Utilities,
    Healthcare,
    Entertainment,
    Shopping,
    Education,
    Savings,
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 12] = [
        Self::Salary,
        Self::Investment,
        Self::Food,
        Self::Transportation,
        Self::Housing,
        Self::Utilities,
        Self::Healthcare,
        Self::Entertainment,
        Self::Shopping,
        Self::Education,
        Self::Savings,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Investment => "Investment",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Housing => "Housing",
            Self::Utilities => "Utilities",
            Self::Healthcare => "Healthcare",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Education => "Education",
            Self::Savings => "Savings",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Salary" => Ok(Self::Salary),
            "Investment" => Ok(Self::Investment),
            "Food" => Ok(Self::Food),
            "Transportation" => Ok(Self::Transportation),
            "Housing" => Ok(Self::Housing),
            "Utilities" => Ok(Self::Utilities),
            "Healthcare" => Ok(Self::Healthcare),
            "Entertainment" => Ok(Self::Entertainment),
            "Shopping" => Ok(Self::Shopping),
            "Education" => Ok(Self::Education),
            "Savings" => Ok(Self::Savings),
            "Other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method used for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "E-Wallet")]
    EWallet,
    #[serde(rename = "Direct Deposit")]
    DirectDeposit,
}

impl PaymentMethod {
    /// All payment methods in display order
    pub const ALL: [PaymentMethod; 6] = [
        Self::Cash,
        Self::CreditCard,
        Self::DebitCard,
        Self::BankTransfer,
        Self::EWallet,
        Self::DirectDeposit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::BankTransfer => "Bank Transfer",
            Self::EWallet => "E-Wallet",
            Self::DirectDeposit => "Direct Deposit",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(Self::Cash),
            "Credit Card" => Ok(Self::CreditCard),
            "Debit Card" => Ok(Self::DebitCard),
            "Bank Transfer" => Ok(Self::BankTransfer),
            "E-Wallet" => Ok(Self::EWallet),
            "Direct Deposit" => Ok(Self::DirectDeposit),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger transaction
///
/// `amount` is always positive; the sign is implied by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDateTime,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl Transaction {
    /// Signed amount: positive for income, negative for expense
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// A transaction about to be recorded
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDateTime,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Validate invariants before hitting the database
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.amount <= 0.0 {
            return Err("Transaction amount must be greater than 0".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Transaction description must not be empty".to_string());
        }
        Ok(())
    }
}

/// Budget period granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Date interval covered by this period around `today`
    ///
    /// Start is the first day of the containing month/quarter/year and end is
    /// its last day, both inclusive.
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let year = today.year();
        match self {
            Self::Monthly => {
                let start = first_of_month(year, today.month());
                (start, last_of_month(year, today.month()))
            }
            Self::Quarterly => {
                let quarter_start_month = ((today.month() - 1) / 3) * 3 + 1;
                let quarter_end_month = quarter_start_month + 2;
                (
                    first_of_month(year, quarter_start_month),
                    last_of_month(year, quarter_end_month),
                )
            }
            Self::Yearly => (first_of_month(year, 1), last_of_month(year, 12)),
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// First day of a month; month must be 1..=12
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

/// Last day of a month; month must be 1..=12
fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let next = if month == 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    };
    next.pred_opt().unwrap_or(next)
}

/// A spending cap for one category over a bounded period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: Category,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold: f64,
}

/// A budget about to be created
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub category: Category,
    pub amount: f64,
    pub period: BudgetPeriod,
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
}

fn default_alert_threshold() -> f64 {
    80.0
}

impl NewBudget {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.amount <= 0.0 {
            return Err("Budget amount must be greater than 0".to_string());
        }
        if self.alert_threshold < 1.0 || self.alert_threshold > 100.0 {
            return Err("Alert threshold must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

/// Budget joined against its matching expenses
///
/// `progress` is clamped to 100 for display; overspend stays visible through
/// `spent - amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub id: i64,
    pub category: Category,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub alert_threshold: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub spent: f64,
    pub progress: f64,
}

/// Savings goal lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Abandoned,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings goal; `current_amount` is advanced manually, not from the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub status: GoalStatus,
}

/// A goal about to be created
#[derive(Debug, Clone, Deserialize)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: f64,
    pub deadline: Option<NaiveDate>,
}

impl NewSavingsGoal {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Goal name must not be empty".to_string());
        }
        if self.target_amount <= 0.0 {
            return Err("Target amount must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Display currency preference (insight formatting stays "$" regardless)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    PHP,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::PHP => "PHP",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "PHP" => Ok(Self::PHP),
            _ => Err(format!("Unknown currency: {}", s)),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-user preferences, updated as a whole
///
/// Named, typed fields only; there is deliberately no way to address an
/// arbitrary column here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserSettings {
    pub currency: Currency,
    pub notification_budget: bool,
    pub notification_goals: bool,
}

/// An application user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub active: bool,
    pub settings: UserSettings,
    pub created_at: DateTime<Utc>,
}

/// A user about to be registered
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A credential rotation request
///
/// Either field may be omitted; the current password is always required.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialUpdate {
    pub current_password: String,
    #[serde(default)]
    pub new_username: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// One user with their computed signed balance (admin dashboards)
#[derive(Debug, Clone, Serialize)]
pub struct UserBalance {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub active: bool,
    pub balance: f64,
}

/// Time windows for ledger summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryWindow {
    /// Trailing 7 days
    Weekly,
    /// First of the current month through today
    Monthly,
    /// Trailing 90 days
    Quarterly,
    /// Trailing 365 days
    Yearly,
}

impl SummaryWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Datetime interval covered by this window ending at `now`
    pub fn range(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let start = match self {
            Self::Weekly => now - chrono::Duration::days(7),
            Self::Monthly => first_of_month(now.year(), now.month())
                .and_hms_opt(0, 0, 0)
                .unwrap_or(now),
            Self::Quarterly => now - chrono::Duration::days(90),
            Self::Yearly => now - chrono::Duration::days(365),
        };
        (start, now)
    }
}

impl std::str::FromStr for SummaryWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown summary window: {}", s)),
        }
    }
}

impl std::fmt::Display for SummaryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Total for one (category, type) pair inside a summary window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub total: f64,
}

/// Income/expense rollup over one summary window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub income: f64,
    pub expenses: f64,
    pub income_count: i64,
    pub expense_count: i64,
    /// income - expenses
    pub savings: f64,
    /// Ordered by total descending, then category name ascending
    pub categories: Vec<CategoryBreakdown>,
}

/// Expense total for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Average expense amount for one hour of the day ("00".."23")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyAverage {
    pub hour: String,
    pub count: i64,
    pub avg_amount: f64,
}

/// Income and expense sums for one calendar month ("YYYY-MM")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRollup {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}
