mod compile_json_test;
mod fluent_rule_test;
