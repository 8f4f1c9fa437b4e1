/// Error details SMSAlert returns in the body of a failed legacy bulk send.
///
/// Both fields are optional because the gateway omits them for some failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
    pub error_code: Option<String>,
}

impl ApiErrorDetail {
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.error_code.is_none()
    }
}
