/// Built-in scenarios: formula parsing, balancing, the three kinetic models and task runs
pub mod reaction_examples;
