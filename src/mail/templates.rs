use askama::Template;

use crate::error::AppError;

#[derive(Template)]
#[template(path = "otp_email.html")]
pub struct OtpEmail<'a> {
    pub fullname: &'a str,
    pub code: &'a str,
    pub ttl_minutes: i64,
}

#[derive(Template)]
#[template(path = "reset_password_email.html")]
pub struct ResetPasswordEmail<'a> {
    pub fullname: &'a str,
    pub reset_url: &'a str,
    pub ttl_minutes: i64,
}

pub fn render(template: &impl Template) -> Result<String, AppError> {
    template
        .render()
        .map_err(|err| AppError::internal_with_source("Gagal menyiapkan email", err))
}

#[cfg(test)]
mod tests {
    use super::{OtpEmail, ResetPasswordEmail, render};

    #[test]
    fn otp_email_contains_code_and_ttl() {
        let html = render(&OtpEmail {
            fullname: "Aisyah",
            code: "042117",
            ttl_minutes: 10,
        })
        .expect("template should render");
        assert!(html.contains("042117"));
        assert!(html.contains("10 menit"));
        assert!(html.contains("Aisyah"));
    }

    #[test]
    fn reset_email_escapes_and_links() {
        let html = render(&ResetPasswordEmail {
            fullname: "<Umar>",
            reset_url: "http://localhost:3000/reset-password?token=abc",
            ttl_minutes: 60,
        })
        .expect("template should render");
        assert!(html.contains("reset-password?token=abc"));
        assert!(!html.contains("<Umar>"));
    }
}
