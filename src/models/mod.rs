mod user;
mod forms;
mod task;

pub use user::{ParseRoleError, Role, User, UserSummary};
pub use forms::{CreateTaskForm, CreateUserForm, LoginForm, RoleQuery, StatusUpdateForm, TaskListQuery};
pub use task::{NewTask, ParseStatusError, Task, TaskFilter, TaskSnapshot, TaskStatus, TaskView, TIMESTAMP_FORMAT};
