//! Form payloads and their validation rules.
//!
//! Each form is a plain deserializable value composing a [`Validation`]
//! accumulator; `validate()` applies the rules and the templates read the
//! recorded errors back out. Missing fields decode to their defaults so a
//! partial submission fails validation instead of form decoding.

use serde::Deserialize;

use pastebox::{
    PERMITTED_EXPIRY_DAYS, Validation, is_email, max_chars, min_chars, not_blank, permitted_value,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(skip)]
    pub validation: Validation,
}

impl SignupForm {
    pub fn validate(&mut self) {
        self.validation
            .check_field(not_blank(&self.name), "name", "this field cannot be empty");
        self.validation
            .check_field(not_blank(&self.email), "email", "this field cannot be empty");
        self.validation.check_field(
            not_blank(&self.password),
            "password",
            "this field cannot be empty",
        );
        self.validation.check_field(
            min_chars(&self.password, 8),
            "password",
            "password must be at least 8 characters long",
        );
        self.validation
            .check_field(is_email(&self.email), "email", "invalid email");
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(skip)]
    pub validation: Validation,
}

impl LoginForm {
    pub fn validate(&mut self) {
        self.validation
            .check_field(not_blank(&self.email), "email", "this field cannot be empty");
        self.validation
            .check_field(is_email(&self.email), "email", "invalid email");
        self.validation.check_field(
            not_blank(&self.password),
            "password",
            "this field cannot be empty",
        );
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnippetCreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expires: i64,
    #[serde(skip)]
    pub validation: Validation,
}

impl SnippetCreateForm {
    pub fn validate(&mut self) {
        self.validation.check_field(
            not_blank(&self.title),
            "title",
            "This field cannot be blank",
        );
        self.validation.check_field(
            max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        self.validation.check_field(
            not_blank(&self.content),
            "content",
            "This field cannot be blank",
        );
        self.validation.check_field(
            permitted_value(self.expires, &PERMITTED_EXPIRY_DAYS),
            "expires",
            "This field must be one of 1, 7, 365",
        );
    }
}
