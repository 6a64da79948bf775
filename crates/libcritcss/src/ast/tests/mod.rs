mod serialize_tests;
mod style_tree_tests;
