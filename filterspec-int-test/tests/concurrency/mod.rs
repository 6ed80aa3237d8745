mod schema_reload_test;
