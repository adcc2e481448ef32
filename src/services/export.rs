use crate::models::{TaskView, TIMESTAMP_FORMAT};

pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Title",
    "Description",
    "Status",
    "Due date",
    "Assignee",
    "Created",
];

/// Renders tasks as a CSV document, one row per task in the given order.
pub fn tasks_to_csv(tasks: &[TaskView]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for view in tasks {
        let task = &view.task;
        writer.write_record([
            task.id.to_string(),
            task.title.clone(),
            task.description.clone(),
            task.status.to_string(),
            task.due_date.clone().unwrap_or_default(),
            view.assigned_login.clone().unwrap_or_default(),
            task.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    // Every field written above is a Rust String, so the buffer is UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
