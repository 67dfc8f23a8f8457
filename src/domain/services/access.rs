use crate::error::AppError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_EMPLOYEE: &str = "employee";

/// The configured role names, in redirect-precedence order. A user holding
/// several roles is routed by the first match in this order.
pub const ROLE_PRECEDENCE: [&str; 3] = [ROLE_ADMIN, ROLE_MANAGER, ROLE_EMPLOYEE];

pub const LOGIN_PATH: &str = "/login";

pub fn is_known_role(role: &str) -> bool {
    ROLE_PRECEDENCE.contains(&role)
}

/// Shared authorization policy for admin-gated API operations: the caller
/// must hold at least one of the required roles.
pub fn authorize(roles: &[String], required: &[&str]) -> Result<(), AppError> {
    if roles.iter().any(|r| required.contains(&r.as_str())) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Requires one of roles: {}",
            required.join(", ")
        )))
    }
}

pub fn has_role(roles: &[String], role: &str) -> bool {
    roles.iter().any(|r| r == role)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredAccess {
    /// Any authenticated user.
    Authenticated,
    /// One of the listed roles.
    Roles(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub name: &'static str,
    pub path: &'static str,
    pub access: RequiredAccess,
}

pub const USERS_ROUTE: RouteRule = RouteRule {
    name: "users",
    path: "/users",
    access: RequiredAccess::Roles(&[ROLE_ADMIN]),
};

pub const MANAGERS_ROUTE: RouteRule = RouteRule {
    name: "managers",
    path: "/managers",
    access: RequiredAccess::Roles(&[ROLE_ADMIN, ROLE_MANAGER]),
};

pub const EMPLOYEES_ROUTE: RouteRule = RouteRule {
    name: "employees",
    path: "/employees",
    access: RequiredAccess::Authenticated,
};

/// Default landing route per role, scanned in precedence order.
const DEFAULT_ROUTES: [(&str, &RouteRule); 3] = [
    (ROLE_ADMIN, &USERS_ROUTE),
    (ROLE_MANAGER, &MANAGERS_ROUTE),
    (ROLE_EMPLOYEE, &EMPLOYEES_ROUTE),
];

pub fn default_route(roles: &[String]) -> Option<&'static RouteRule> {
    DEFAULT_ROUTES
        .iter()
        .find(|(role, _)| has_role(roles, role))
        .map(|(_, rule)| *rule)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

/// Pure route guard. `session` is None for anonymous visitors, otherwise the
/// role set of the authenticated user.
///
/// A user holding none of the known roles falls through every check: no
/// redirect target exists, so they stay on the attempted route.
pub fn evaluate(rule: &RouteRule, session: Option<&[String]>) -> Decision {
    let Some(roles) = session else {
        return Decision::Redirect(LOGIN_PATH);
    };

    match rule.access {
        RequiredAccess::Authenticated => Decision::Allow,
        RequiredAccess::Roles(allowed) => {
            if roles.iter().any(|r| allowed.contains(&r.as_str())) {
                Decision::Allow
            } else {
                match default_route(roles) {
                    Some(target) => Decision::Redirect(target.path),
                    None => Decision::Allow,
                }
            }
        }
    }
}
