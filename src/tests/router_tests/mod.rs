mod evaluate_tests;
mod history_tests;
mod page_tests;
