mod progress;
mod styling;
mod tables;

use comfy_table::{Cell, Table};

use crate::error::WakkaError;
use crate::providers::circleci::{Project, Variable};

pub use progress::Spinner;
use styling::{bold, bright_red};
use tables::{build_table, color_coded_status_cell};

const PROJECT_HEADER: [&str; 3] = [
    "Project Name",
    "Master Latest Build No",
    "Master Latest Build Status",
];
const VARIABLE_HEADER: [&str; 2] = ["Variable Name", "Variable Value"];

pub fn print_version() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

pub fn print_usage() {
    println!("usage: {} <command> [<args>]", bold("wakka"));
    println!(" variables   Manage Project Environment Variables.");
}

/// Diagnostics go to stdout, matching the rest of the tool's output.
pub fn print_error(err: &WakkaError) {
    match err {
        WakkaError::MissingRequiredFlag(prompt) => println!("{prompt}"),
        other => println!("{}", bright_red(other)),
    }
}

pub fn projects_table(projects: &[Project]) -> Table {
    let rows = projects.iter().map(|project| {
        vec![
            Cell::new(&project.name),
            Cell::new(project.build_number_label()),
            color_coded_status_cell(project.status_label()),
        ]
    });
    build_table(&PROJECT_HEADER, rows)
}

pub fn variables_table(variables: &[Variable]) -> Table {
    let rows = variables
        .iter()
        .map(|variable| vec![variable.name.clone(), variable.value.clone()]);
    build_table(&VARIABLE_HEADER, rows)
}

pub fn print_projects(projects: &[Project]) {
    println!("{}", projects_table(projects));
}

pub fn print_variables(variables: &[Variable]) {
    println!("{}", variables_table(variables));
}
