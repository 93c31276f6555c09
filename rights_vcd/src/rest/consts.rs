pub const AUTH_HEADER: &str = "x-vcloud-authorization";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const ACCEPT_HEADER: &str = "Accept";
pub const USER_AGENT_HEADER: &str = "User-Agent";
pub const USER_AGENT: &str = "vcd-rights";

pub const VCLOUD_NAMESPACE: &str = "http://www.vmware.com/vcloud/v1.5";

pub const ADMIN_MEDIA_TYPE: &str = "application/vnd.vmware.admin.vcloud+xml";
pub const ORG_LIST_MEDIA_TYPE: &str = "application/vnd.vmware.vcloud.orgList+xml";
pub const ORG_RIGHTS_MEDIA_TYPE: &str = "application/vnd.vmware.admin.org.rights+xml";
pub const RIGHT_MEDIA_TYPE: &str = "application/vnd.vmware.admin.right+xml";

/// Build the versioned `Accept` value for an API version.
pub fn accept_header_value(api_version: &str) -> String {
    format!("application/*+xml;version={api_version}")
}
