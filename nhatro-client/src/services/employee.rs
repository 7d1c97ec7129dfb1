//! Employees (`nhan_vien`)

use std::ops::Deref;

use shared::models::Employee;

use crate::client::http::{HttpClient, NetworkHttpClient};
use crate::resource::ResourceClient;
use crate::transport::Transport;

pub const EMPLOYEES_PATH: &str = "employees";

#[derive(Debug)]
pub struct EmployeeService<H: HttpClient = NetworkHttpClient> {
    resource: ResourceClient<Employee, H>,
}

impl<H: HttpClient> Clone for EmployeeService<H> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<H: HttpClient> EmployeeService<H> {
    pub fn new(transport: Transport<H>) -> Self {
        Self {
            resource: ResourceClient::new(transport, EMPLOYEES_PATH),
        }
    }
}

impl<H: HttpClient> Deref for EmployeeService<H> {
    type Target = ResourceClient<Employee, H>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
