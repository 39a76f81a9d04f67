//! Authorized endpoints. Every request carries the session's bearer token.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use eventhub_core::result::AppResult;
use eventhub_core::traits::TokenProvider;
use eventhub_core::types::{EventId, Identity, RegistrationId, ReviewId};

use super::http::{HttpClient, file_part};
use crate::models::{
    AttendanceExport, AttendanceFilters, AttendanceMark, AttendanceRecord, Event, EventDecision,
    EventFilters, EventStatus, NewEvent, ProfileUpdate, Receipt, Registration, Review,
    ReviewSubmission,
};

#[derive(Debug, Deserialize)]
struct UserBody {
    user: Identity,
}

#[derive(Debug, Deserialize)]
struct EventsBody {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventBody {
    Wrapped { event: Event },
    Bare(Event),
}

impl EventBody {
    fn into_event(self) -> Event {
        match self {
            Self::Wrapped { event } | Self::Bare(event) => event,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistrationsBody {
    #[serde(default)]
    registrations: Vec<Registration>,
}

#[derive(Debug, Deserialize)]
struct ReviewsBody {
    #[serde(default)]
    reviews: Vec<Review>,
}

#[derive(Debug, Deserialize)]
struct AttendanceBody {
    #[serde(default)]
    attendance: Vec<AttendanceRecord>,
}

/// REST client for the signed-in user.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Client that reads the bearer token from `tokens` on every request.
    pub fn new(http: HttpClient, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { http, tokens }
    }

    /// Request with the `Authorization` header attached when a token exists.
    fn authorized(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<RequestBuilder> {
        let request = self.http.request(method, path, query)?;
        Ok(match self.tokens.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => {
                debug!(path, "No session token, sending request unauthenticated");
                request
            }
        })
    }

    // --- Users ---

    /// `GET /user/profile`
    pub async fn profile(&self) -> AppResult<Identity> {
        let request = self.authorized(Method::GET, "/user/profile", &[])?;
        let body: UserBody = self.http.send(request).await?;
        Ok(body.user)
    }

    /// `PUT /user/profile/update` (multipart)
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<Identity> {
        let mut form = Form::new();
        if let Some(name) = &update.full_name {
            form = form.text("fullName", name.clone());
        }
        if let Some(contact) = &update.contact_number {
            form = form.text("contactNumber", contact.clone());
        }
        if let Some(avatar) = &update.avatar {
            form = form.part("file", file_part(avatar).await?);
        }
        let request = self
            .authorized(Method::PUT, "/user/profile/update", &[])?
            .multipart(form);
        let body: UserBody = self.http.send(request).await?;
        Ok(body.user)
    }

    // --- Events ---

    /// `GET /event/all`
    pub async fn events(&self, filters: &EventFilters) -> AppResult<Vec<Event>> {
        let request = self.authorized(Method::GET, "/event/all", &filters.to_query())?;
        let body: EventsBody = self.http.send(request).await?;
        Ok(body.events)
    }

    /// `GET /event/:id`
    pub async fn event(&self, id: &EventId) -> AppResult<Event> {
        let request = self.authorized(Method::GET, &format!("/event/{id}"), &[])?;
        let body: EventBody = self.http.send(request).await?;
        Ok(body.into_event())
    }

    /// `POST /event/create` (multipart)
    pub async fn create_event(&self, event: &NewEvent) -> AppResult<Event> {
        let mut form = Form::new()
            .text("title", event.title.clone())
            .text("description", event.description.clone())
            .text("date", event.date.clone())
            .text("location", event.location.clone());
        if let Some(poster) = &event.poster {
            form = form.part("poster", file_part(poster).await?);
        }
        let request = self
            .authorized(Method::POST, "/event/create", &[])?
            .multipart(form);
        let body: EventBody = self.http.send(request).await?;
        Ok(body.into_event())
    }

    /// `PUT /event/approve-reject/:id`
    pub async fn decide_event(&self, id: &EventId, decision: &EventDecision) -> AppResult<Receipt> {
        let request = self
            .authorized(Method::PUT, &format!("/event/approve-reject/{id}"), &[])?
            .json(decision);
        self.http.send(request).await
    }

    /// `PUT /event/status/:id`
    pub async fn set_event_status(&self, id: &EventId, status: &EventStatus) -> AppResult<Receipt> {
        let request = self
            .authorized(Method::PUT, &format!("/event/status/{id}"), &[])?
            .json(&json!({ "status": status }));
        self.http.send(request).await
    }

    /// `DELETE /event/delete/:id`
    pub async fn delete_event(&self, id: &EventId) -> AppResult<()> {
        let request = self.authorized(Method::DELETE, &format!("/event/delete/{id}"), &[])?;
        self.http.send_empty(request).await
    }

    // --- Registrations ---

    /// `POST /registration/register`
    pub async fn register_for_event(&self, event_id: &EventId) -> AppResult<Receipt> {
        let request = self
            .authorized(Method::POST, "/registration/register", &[])?
            .json(&json!({ "eventId": event_id }));
        self.http.send(request).await
    }

    /// `GET /registration/my`
    pub async fn my_registrations(&self) -> AppResult<Vec<Registration>> {
        let request = self.authorized(Method::GET, "/registration/my", &[])?;
        let body: RegistrationsBody = self.http.send(request).await?;
        Ok(body.registrations)
    }

    /// `GET /registration/event/:id`
    pub async fn event_registrations(&self, event_id: &EventId) -> AppResult<Vec<Registration>> {
        let path = format!("/registration/event/{event_id}");
        let request = self.authorized(Method::GET, &path, &[])?;
        let body: RegistrationsBody = self.http.send(request).await?;
        Ok(body.registrations)
    }

    /// `DELETE /registration/cancel/:id`
    pub async fn cancel_registration(&self, id: &RegistrationId) -> AppResult<()> {
        let path = format!("/registration/cancel/{id}");
        let request = self.authorized(Method::DELETE, &path, &[])?;
        self.http.send_empty(request).await
    }

    // --- Attendance ---

    /// `POST /attendance/mark`
    pub async fn mark_attendance(&self, mark: &AttendanceMark) -> AppResult<Receipt> {
        let request = self
            .authorized(Method::POST, "/attendance/mark", &[])?
            .json(mark);
        self.http.send(request).await
    }

    /// `GET /attendance/event/:id`
    pub async fn event_attendance(&self, event_id: &EventId) -> AppResult<Vec<AttendanceRecord>> {
        let path = format!("/attendance/event/{event_id}");
        let request = self.authorized(Method::GET, &path, &[])?;
        let body: AttendanceBody = self.http.send(request).await?;
        Ok(body.attendance)
    }

    /// `GET /attendance/download`
    pub async fn download_attendance(
        &self,
        filters: &AttendanceFilters,
    ) -> AppResult<AttendanceExport> {
        let request = self.authorized(Method::GET, "/attendance/download", &filters.to_query())?;
        self.http.send(request).await
    }

    // --- Reviews ---

    /// `POST /review/submit/:eventId` (multipart with attachments)
    pub async fn submit_review(
        &self,
        event_id: &EventId,
        review: &ReviewSubmission,
    ) -> AppResult<Receipt> {
        let mut form = Form::new()
            .text("rating", review.rating.to_string())
            .text("content", review.content.clone())
            .text("category", review.category.clone());
        for attachment in &review.attachments {
            form = form.part("attachments", file_part(attachment).await?);
        }
        let request = self
            .authorized(Method::POST, &format!("/review/submit/{event_id}"), &[])?
            .multipart(form);
        self.http.send(request).await
    }

    /// `GET /review/event/:eventId`
    pub async fn event_reviews(&self, event_id: &EventId) -> AppResult<Vec<Review>> {
        let request = self.authorized(Method::GET, &format!("/review/event/{event_id}"), &[])?;
        let body: ReviewsBody = self.http.send(request).await?;
        Ok(body.reviews)
    }

    /// `GET /review/my`
    pub async fn my_reviews(&self) -> AppResult<Vec<Review>> {
        let request = self.authorized(Method::GET, "/review/my", &[])?;
        let body: ReviewsBody = self.http.send(request).await?;
        Ok(body.reviews)
    }

    /// `DELETE /review/delete/:id`
    pub async fn delete_review(&self, id: &ReviewId) -> AppResult<()> {
        let request = self.authorized(Method::DELETE, &format!("/review/delete/{id}"), &[])?;
        self.http.send_empty(request).await
    }
}
