mod merit_tests;
mod property_expr_tests;
