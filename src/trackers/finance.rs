use crate::metrics::{DistributionBucket, Insight, InsightSet, distribution, percent_of};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
    Investment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[default]
    Checking,
    Savings,
    Credit,
    Investment,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: AccountKind,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: String,
    pub limit: f64,
    /// As stored. Summaries recompute it from the transactions.
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Budget {
    pub fn covers(&self, transaction: &Transaction) -> bool {
        transaction.kind == TransactionKind::Expense
            && transaction.category == self.category
            && transaction.date >= self.start_date
            && transaction.date <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceData {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl FinanceData {
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.accounts.iter().flat_map(|a| a.transactions.iter())
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions()
            .filter(|t| t.kind == TransactionKind::Expense)
    }

    pub fn spent_against(&self, budget: &Budget) -> f64 {
        self.transactions()
            .filter(|t| budget.covers(t))
            .map(|t| t.amount)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub name: String,
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub utilization_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub category: String,
    pub amount: f64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_balance: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_flow: f64,
    pub savings_rate: f64,
    pub budget_utilization: f64,
    pub budgets: Vec<BudgetStatus>,
    pub largest_expense: Option<Transaction>,
    /// How many expenses fall in each category.
    pub expenses_by_category: Vec<DistributionBucket>,
    pub spending_by_category: Vec<CategorySpend>,
    pub insights: Vec<Insight>,
}

pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

pub fn summarize(data: &FinanceData, _session: &Session) -> FinanceSummary {
    let total_balance: f64 = data.accounts.iter().map(|a| a.balance).sum();
    let total_income: f64 = data
        .transactions()
        .filter(|t| t.kind == TransactionKind::Income)
        .map(|t| t.amount)
        .sum();
    let total_expenses: f64 = data.expenses().map(|t| t.amount).sum();
    let net_flow = total_income - total_expenses;
    let savings_rate = percent_of(net_flow, total_income);

    let budgets: Vec<BudgetStatus> = data
        .budgets
        .iter()
        .map(|budget| {
            let spent = data.spent_against(budget);
            BudgetStatus {
                name: budget.name.clone(),
                category: budget.category.clone(),
                limit: budget.limit,
                spent,
                utilization_percent: percent_of(spent, budget.limit),
            }
        })
        .collect();
    let total_spent: f64 = budgets.iter().map(|b| b.spent).sum();
    let total_limit: f64 = budgets.iter().map(|b| b.limit).sum();
    let budget_utilization = percent_of(total_spent, total_limit);

    // First of equal amounts wins.
    let largest_expense = data
        .expenses()
        .fold(None::<&Transaction>, |largest, t| match largest {
            Some(l) if l.amount >= t.amount => Some(l),
            _ => Some(t),
        })
        .cloned();

    let expenses_by_category = distribution(data.expenses().map(|t| t.category.as_str()));
    let spending_by_category = category_spend(data, total_expenses);

    let mut insights = InsightSet::new();
    if net_flow > 0.0 {
        insights.push(Insight::positive(format!(
            "Positive cash flow: +{} this period! Keep it up!",
            format_currency(net_flow)
        )));
    } else if net_flow < 0.0 {
        insights.push(Insight::warning(format!(
            "Negative cash flow: {}. Consider reviewing expenses.",
            format_currency(net_flow)
        )));
    }

    if savings_rate >= 20.0 {
        insights.push(Insight::positive(format!(
            "Excellent savings rate: {savings_rate:.1}%! You're building wealth effectively!"
        )));
    } else if savings_rate >= 10.0 {
        insights.push(Insight::positive(format!(
            "Good savings rate: {savings_rate:.1}%. On track for financial goals!"
        )));
    } else if savings_rate < 0.0 {
        insights.push(Insight::critical(
            "You're spending more than you earn! Immediate action needed!",
        ));
    }

    if budget_utilization > 100.0 {
        insights.push(Insight::critical(format!(
            "You've exceeded your budget by {:.1}%! Review spending!",
            budget_utilization - 100.0
        )));
    } else if budget_utilization > 90.0 {
        insights.push(Insight::warning(format!(
            "High budget utilization: {budget_utilization:.1}%. Some categories may be close to their limit!"
        )));
    }

    if let Some(expense) = &largest_expense {
        insights.push(Insight::neutral(format!(
            "Largest expense: {} ({})",
            expense.description,
            format_currency(expense.amount)
        )));
    }

    FinanceSummary {
        total_balance,
        total_income,
        total_expenses,
        net_flow,
        savings_rate,
        budget_utilization,
        budgets,
        largest_expense,
        expenses_by_category,
        spending_by_category,
        insights: insights.finish(Insight::neutral(
            "Start tracking your finances to gain insights and improve your financial health!",
        )),
    }
}

fn category_spend(data: &FinanceData, total_expenses: f64) -> Vec<CategorySpend> {
    let mut spend: Vec<CategorySpend> = Vec::new();
    for expense in data.expenses() {
        match spend.iter_mut().find(|c| c.category == expense.category) {
            Some(entry) => entry.amount += expense.amount,
            None => spend.push(CategorySpend {
                category: expense.category.clone(),
                amount: expense.amount,
                share_percent: 0.0,
            }),
        }
    }
    for entry in &mut spend {
        entry.share_percent = percent_of(entry.amount, total_expenses);
    }
    spend.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    spend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InsightTone;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn tx(date: NaiveDate, kind: TransactionKind, category: &str, amount: f64) -> Transaction {
        Transaction {
            id: format!("{category}-{amount}"),
            date,
            description: category.to_string(),
            amount,
            kind,
            category: category.into(),
            payment_method: "card".into(),
            status: TransactionStatus::Completed,
            recurring: false,
            recurring_frequency: None,
            notes: String::new(),
        }
    }

    fn budget(category: &str, limit: f64) -> Budget {
        Budget {
            id: category.into(),
            name: format!("{category} budget"),
            category: category.into(),
            limit,
            spent: 0.0,
            period: BudgetPeriod::Monthly,
            start_date: day(3, 1),
            end_date: day(3, 31),
        }
    }

    fn data(transactions: Vec<Transaction>, budgets: Vec<Budget>) -> FinanceData {
        FinanceData {
            accounts: vec![Account {
                id: "acc".into(),
                name: "Main".into(),
                kind: AccountKind::Checking,
                balance: 1200.0,
                currency: "USD".into(),
                transactions,
                goal: None,
            }],
            budgets,
            last_updated: None,
        }
    }

    fn session() -> Session {
        Session::at("u1", day(3, 20), 12)
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-50.0), "-$50.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn healthy_month() {
        let finance = data(
            vec![
                tx(day(3, 1), TransactionKind::Income, "Salary", 3000.0),
                tx(day(3, 5), TransactionKind::Expense, "Food", 400.0),
                tx(day(3, 9), TransactionKind::Expense, "Rent", 1000.0),
                tx(day(3, 9), TransactionKind::Transfer, "Savings", 500.0),
            ],
            vec![budget("Food", 600.0)],
        );
        let summary = summarize(&finance, &session());

        assert_eq!(summary.total_income, 3000.0);
        assert_eq!(summary.total_expenses, 1400.0);
        assert_eq!(summary.net_flow, 1600.0);
        assert!((summary.savings_rate - 53.333).abs() < 0.01);
        assert_eq!(summary.budgets[0].spent, 400.0);
        assert_eq!(summary.largest_expense.as_ref().unwrap().amount, 1000.0);
        assert_eq!(summary.spending_by_category[0].category, "Rent");
        assert_eq!(summary.spending_by_category[1].amount, 400.0);

        let messages: Vec<_> = summary.insights.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages[0], "Positive cash flow: +$1,600.00 this period! Keep it up!");
        assert!(messages[1].starts_with("Excellent savings rate: 53.3%"));
        assert_eq!(messages[2], "Largest expense: Rent ($1,000.00)");
    }

    #[test]
    fn category_distribution_counts_entries_not_money() {
        let finance = data(
            vec![
                tx(day(3, 2), TransactionKind::Expense, "Rent", 500.0),
                tx(day(3, 3), TransactionKind::Expense, "Food", 10.0),
                tx(day(3, 4), TransactionKind::Expense, "Food", 10.0),
                tx(day(3, 4), TransactionKind::Income, "Salary", 900.0),
            ],
            Vec::new(),
        );
        let summary = summarize(&finance, &session());

        let buckets = &summary.expenses_by_category;
        assert_eq!(buckets.len(), 2);
        assert_eq!((buckets[0].label.as_str(), buckets[0].count), ("Food", 2));
        assert!((buckets[0].percentage - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!((buckets[1].label.as_str(), buckets[1].count), ("Rent", 1));
        assert!((buckets[1].percentage - 100.0 / 3.0).abs() < 1e-9);

        assert_eq!(summary.spending_by_category[0].category, "Rent");
        assert!((summary.spending_by_category[0].share_percent - 500.0 / 5.2).abs() < 1e-9);
    }

    #[test]
    fn free_expenses_still_fill_the_distribution() {
        let finance = data(
            vec![
                tx(day(3, 2), TransactionKind::Expense, "Gifts", 0.0),
                tx(day(3, 3), TransactionKind::Expense, "Books", 0.0),
            ],
            Vec::new(),
        );
        let summary = summarize(&finance, &session());

        let total: f64 = summary.expenses_by_category.iter().map(|b| b.percentage).sum();
        assert_eq!(total, 100.0);
        assert_eq!(summary.expenses_by_category[0].label, "Gifts");
        assert_eq!(summary.spending_by_category[0].share_percent, 0.0);
    }

    #[test]
    fn over_budget_is_critical_before_warning() {
        let finance = data(
            vec![
                tx(day(3, 2), TransactionKind::Expense, "Fun", 150.0),
                tx(day(2, 28), TransactionKind::Expense, "Fun", 999.0),
            ],
            vec![budget("Fun", 100.0)],
        );
        let summary = summarize(&finance, &session());

        assert_eq!(summary.budget_utilization, 150.0);
        let over = summary
            .insights
            .iter()
            .find(|i| i.message.starts_with("You've exceeded your budget by 50.0%"))
            .unwrap();
        assert_eq!(over.tone, InsightTone::Critical);
        assert!(!summary.insights.iter().any(|i| i.message.starts_with("High budget")));
    }

    #[test]
    fn near_limit_warns() {
        let finance = data(
            vec![tx(day(3, 2), TransactionKind::Expense, "Fun", 95.0)],
            vec![budget("Fun", 100.0)],
        );
        let summary = summarize(&finance, &session());
        assert!(summary
            .insights
            .iter()
            .any(|i| i.tone == InsightTone::Warning && i.message.starts_with("High budget utilization: 95.0%")));
    }

    #[test]
    fn empty_finance_falls_back() {
        let summary = summarize(&FinanceData::default(), &session());
        assert_eq!(summary.savings_rate, 0.0);
        assert_eq!(summary.insights.len(), 1);
        assert!(summary.insights[0].message.starts_with("Start tracking your finances"));
    }
}
