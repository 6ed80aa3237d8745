mod field_validation_test;
mod tree_shape_test;
