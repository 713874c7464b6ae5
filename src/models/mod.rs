pub mod user;
pub mod expense;

pub use user::{User, SignupRequest, SignupResponse, LoginRequest, LoginResponse};
pub use expense::{Expense, CreateExpense, ExpenseFields, CategoryAmount};
