use rust_decimal::Decimal;

use super::Transaction;

/// Income, expenses and their net over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub income: Decimal,
    /// Always `<= 0`.
    pub expenses: Decimal,
    pub balance: Decimal,
}

impl Summary {
    /// Sign-split sums; zero amounts count toward neither side.
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        txns.iter().fold(Self::default(), |mut acc, txn| {
            if txn.is_income() {
                acc.income += txn.amount;
            } else if txn.is_expense() {
                acc.expenses += txn.amount;
            }
            acc.balance += txn.amount;
            acc
        })
    }
}
