use sqc::Project;

/// The module's result rendered, or its error message.
pub fn result(project: &Project, id: &str) -> String {
    match project.get_result(id) {
        Ok(value) => value.to_string(),
        Err(error) => format!("error: {error}"),
    }
}

pub fn ids(items: &[&str]) -> Vec<String> {
    items.iter().map(|id| (*id).to_string()).collect()
}
