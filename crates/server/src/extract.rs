use crate::error::ApiError;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use database::{
    entities::{classes, rooms, students, subjects, teachers, time_slots, timetable_entries},
    error::ServiceError,
};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use uuid::Uuid;

/// JSON request body whose rejections render as API errors
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        Ok(Payload(value))
    }
}

/// Something addressed by an `{id}` path segment
pub trait Resource {
    /// Name used in the not-found message
    const NAME: &'static str;
}

impl Resource for rooms::Entity {
    const NAME: &'static str = "Room";
}

impl Resource for subjects::Entity {
    const NAME: &'static str = "Subject";
}

impl Resource for teachers::Entity {
    const NAME: &'static str = "Teacher";
}

impl Resource for classes::Entity {
    const NAME: &'static str = "Class";
}

impl Resource for students::Entity {
    const NAME: &'static str = "Student";
}

impl Resource for time_slots::Entity {
    const NAME: &'static str = "Time slot";
}

impl Resource for timetable_entries::Entity {
    const NAME: &'static str = "Timetable entry";
}

/// The `{id}` of a resource. A segment that is not a UUID names no row, so it
/// is answered like any other unknown id.
pub struct Id<R>(pub Uuid, pub PhantomData<R>);

impl<S, R> FromRequestParts<S> for Id<R>
where
    R: Resource,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<Uuid>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Id(id, PhantomData)),
            Err(PathRejection::FailedToDeserializePathParams(_)) => {
                Err(ServiceError::NotFound(R::NAME).into())
            }
            Err(rejection) => Err(ApiError::new(rejection.status(), rejection.body_text())),
        }
    }
}

/// Query string whose rejections render as API errors
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        Ok(Params(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::{Request as HttpRequest, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Filter {
        capacity: Option<i32>,
    }

    #[tokio::test]
    async fn test_params_rejection_is_bad_request() {
        let (mut parts, _) = HttpRequest::builder()
            .uri("/rooms?capacity=lots")
            .body(())
            .unwrap()
            .into_parts();

        let err = Params::<Filter>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let (mut parts, _) = HttpRequest::builder()
            .uri("/rooms?capacity=40")
            .body(())
            .unwrap()
            .into_parts();
        let Params(filter) = Params::<Filter>::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(filter.capacity, Some(40));
    }
}
