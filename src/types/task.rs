use serde::{Deserialize, Serialize};
use specta::Type;

/// A task as reported by the task service. Field names follow the upstream
/// wire format: the service selects `id, tarea, completada, fecha_creacion`
/// and serializes `completada` as a JSON boolean.
#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct Task {
    pub id: i64,
    pub tarea: String,
    pub completada: bool,
    pub fecha_creacion: String,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        !self.completada
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct PendingTasksResponse {
    pub tareas_pendientes: Vec<Task>,
}
