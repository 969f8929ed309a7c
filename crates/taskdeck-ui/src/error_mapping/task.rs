use crate::error::TaskError;
use taskdeck_core::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
use taskdeck_services::TaskApiError;

impl From<TaskError> for AppError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::Api(TaskApiError::Network(e)) => AppError::Network(e.into_network_error()),
            TaskError::Api(TaskApiError::Rejected { status, body }) => {
                AppError::Network(NetworkError::ServerError {
                    status,
                    message: body,
                })
            }
            TaskError::Api(TaskApiError::InvalidUrl(e)) => {
                AppError::Config(ConfigError::Invalid(e.to_string()))
            }
            TaskError::NotFoundLocally(id) => {
                AppError::Service(format!("Task {} is not in the local list", id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_maps_to_server_error() {
        let app: AppError = TaskError::Api(TaskApiError::Rejected {
            status: 503,
            body: "down".into(),
        })
        .into();
        assert!(matches!(
            app,
            AppError::Network(NetworkError::ServerError { status: 503, .. })
        ));
    }

    #[test]
    fn missing_task_maps_to_service_error() {
        let app: AppError = TaskError::NotFoundLocally(4).into();
        assert!(matches!(app, AppError::Service(_)));
        assert!(app.to_string().contains('4'));
    }
}
