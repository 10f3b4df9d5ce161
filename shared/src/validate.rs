//! 表单校验规则
//!
//! 提交前同步执行的字段级规则。每个字段变更都会重新求值，
//! 所以提交按钮的可用状态是响应式的；任何字段未通过时
//! 完全不会发起网络请求。

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

// =========================================================
// 字段规则 (Field Rules)
// =========================================================

/// 邮箱形状检查：`local@domain`，domain 至少带一个点
fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
        && !domain.contains('@')
}

pub fn email_error(value: &str) -> Option<&'static str> {
    if is_valid_email(value) {
        None
    } else {
        Some("Invalid email address")
    }
}

pub fn password_error(value: &str) -> Option<&'static str> {
    if value.len() >= MIN_PASSWORD_LEN {
        None
    } else {
        Some("Password must be at least 6 characters")
    }
}

pub fn name_error(value: &str) -> Option<&'static str> {
    if value.trim().len() >= MIN_NAME_LEN {
        None
    } else {
        Some("Name must be at least 2 characters")
    }
}

/// 确认密码规则。错误归属于确认字段本身，而不是整张表单。
pub fn confirm_error(password: &str, confirm: &str) -> Option<&'static str> {
    if password == confirm {
        None
    } else {
        Some("Passwords don't match")
    }
}

pub fn message_error(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some("Message cannot be empty")
    } else {
        None
    }
}

// =========================================================
// 表单级汇总 (Form Schemas)
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoginErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginErrors {
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

pub fn validate_login(email: &str, password: &str) -> LoginErrors {
    LoginErrors {
        email: email_error(email),
        password: password_error(password),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegisterErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm: Option<&'static str>,
}

impl RegisterErrors {
    pub fn is_valid(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm.is_none()
    }
}

pub fn validate_register(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> RegisterErrors {
    RegisterErrors {
        name: name_error(name),
        email: email_error(email),
        password: password_error(password),
        confirm: confirm_error(password, confirm),
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        for ok in ["a@b.co", "student@campus.edu", "first.last@sub.domain.org"] {
            assert!(email_error(ok).is_none(), "{ok} should be valid");
        }
        for bad in ["", "plain", "@no-local.com", "no-at.com", "a@nodot", "a b@c.d", "a@.com"] {
            assert!(email_error(bad).is_some(), "{bad} should be invalid");
        }
    }

    #[test]
    fn password_minimum_length() {
        assert!(password_error("12345").is_some());
        assert!(password_error("123456").is_none());
    }

    #[test]
    fn name_minimum_length() {
        assert!(name_error("A").is_some());
        assert!(name_error("  A  ").is_some());
        assert!(name_error("Al").is_none());
    }

    #[test]
    fn mismatched_confirmation_is_attached_to_the_confirm_field() {
        let errors = validate_register("Alice", "alice@campus.edu", "secret1", "secret2");
        assert!(errors.name.is_none());
        assert!(errors.email.is_none());
        assert!(errors.password.is_none());
        assert_eq!(errors.confirm, Some("Passwords don't match"));
        assert!(!errors.is_valid());
    }

    #[test]
    fn valid_forms_pass() {
        assert!(validate_login("alice@campus.edu", "secret1").is_valid());
        assert!(validate_register("Alice", "alice@campus.edu", "secret1", "secret1").is_valid());
    }

    #[test]
    fn chat_message_must_have_content_after_trimming() {
        assert!(message_error("").is_some());
        assert!(message_error("   \n\t").is_some());
        assert!(message_error(" hi ").is_none());
    }
}
