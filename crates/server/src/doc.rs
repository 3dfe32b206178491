use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation. Paths are collected from the routers in [`crate::app`].
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
        (name = "Rooms", description = "Lecture halls, labs and other teaching rooms"),
        (name = "Subjects", description = "Taught subjects and the teachers qualified for them"),
        (name = "Teachers", description = "Teaching staff"),
        (name = "Classes", description = "Student cohorts"),
        (name = "Students", description = "Students and their class enrollment"),
        (name = "Time slots", description = "Periods of the teaching week"),
        (name = "Timetable", description = "Scheduled lessons, checked for double bookings"),
        (name = "Users", description = "Account administration"),
        (name = "Dashboard", description = "Overview statistics"),
        (name = "Me", description = "Views scoped to the caller"),
        (name = "Assistant", description = "AI scheduling assistant"),
        (name = "Health", description = "Liveness"),
    ),
    info(
        title = "Timetable API",
        version = "1.0.0",
        description = "Conflict-checked weekly timetable management",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
