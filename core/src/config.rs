//! Process-wide protocol constants for the client web service.
//!
//! # Design
//! Everything the server checks bit-for-bit lives here as a `const`: the
//! endpoint, namespace URIs, the anonymous ticket and the device-attributes
//! descriptor. `ServiceConfig` carries only the two values a caller may
//! reasonably point elsewhere (endpoint and CDN host filter); it defaults to
//! the constants below.

/// Secured client web service endpoint. The only production destination.
pub const SECURED_ENDPOINT: &str =
    "https://fe3.delivery.mp.microsoft.com/ClientWebService/client.asmx/secured";

/// Base of the SOAP action URI; the operation name is appended.
pub const ACTION_BASE: &str = "http://www.microsoft.com/SoftwareDistribution/Server/ClientWebService/";

/// Operation dispatched by the server.
pub const OPERATION: &str = "GetExtendedUpdateInfo2";

pub const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const ADDRESSING_NS: &str = "http://www.w3.org/2005/08/addressing";
pub const SECEXT_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
pub const SECUTIL_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
pub const CLIENT_SERVICE_NS: &str =
    "http://www.microsoft.com/SoftwareDistribution/Server/ClientWebService";
pub const AUTHORIZATION_NS: &str = "http://schemas.microsoft.com/msus/2014/10/WindowsUpdateAuthorization";

/// Fixed correlation token; the server does not require it to be unique.
pub const MESSAGE_ID: &str = "urn:uuid:5754a03d-d8d5-489f-b24d-efc31b3fd32d";

/// Value of every `mustUnderstand` attribute.
pub const MUST_UNDERSTAND: &str = "1";

pub const TICKET_ID: &str = "ClientMSA";

/// Anonymous ticket entries as `(Name, Version, Policy)`, in wire order.
pub const TICKET_TYPES: [(&str, &str, &str); 2] = [
    ("MSA", "1.0", "MBI_SSL"),
    ("AAD", "1.0", "MBI_SSL"),
];

pub const REVISION_NUMBER: u32 = 1;

pub const FRAGMENT_TYPE: &str = "FileUrl";

/// Lifetime of the security timestamp, in seconds.
pub const EXPIRY_WINDOW_SECS: i64 = 5 * 60;

pub const CONTENT_TYPE: &str = "application/soap+xml";

/// Only URLs containing this fragment are accepted as download links.
///
/// If the service moves to another delivery host every lookup degrades to
/// "not found" rather than failing.
pub const CDN_HOST_FILTER: &str = "http://tlu.dl.delivery.mp.microsoft.com";

/// Synthetic client platform the server uses to pick compatible files.
pub const DEVICE_ATTRIBUTES: &str = "E:BranchReadinessLevel=CBB&DchuNvidiaGrfxExists=1&ProcessorIdentifier=Intel64%20Family%206%20Model%2063%20Stepping%202&CurrentBranch=rs4_release&DataVer_RS5=1942&FlightRing=Retail&AttrDataVer=57&InstallLanguage=en-US&DchuAmdGrfxExists=1&OSUILocale=en-US&InstallationType=Client&FlightingBranchName=&Version_RS5=10&UpgEx_RS5=Green&GStatus_RS5=2&OSSkuId=48&App=WU&InstallDate=1529700913&ProcessorManufacturer=GenuineIntel&AppVer=10.0.17134.471&OSArchitecture=AMD64&UpdateManagementGroup=2&IsDeviceRetailDemo=0&HidOverGattReg=C%3A%5CWINDOWS%5CSystem32%5CDriverStore%5CFileRepository%5Chidbthle.inf_amd64_467f181075371c89%5CMicrosoft.Bluetooth.Profiles.HidOverGatt.dll&IsFlightingEnabled=0&DchuIntelGrfxExists=1&TelemetryLevel=1&DefaultUserRegion=244&DeferFeatureUpdatePeriodInDays=365&Bios=Unknown&WuClientVer=10.0.17134.471&PausedFeatureStatus=1&Steam=URL%3Asteam%20protocol&Free=8to16&OSVersion=10.0.17134.472&DeviceFamily=Windows.Desktop";

/// Caller-adjustable part of the service description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Where the envelope is POSTed. Also used as the `To` header.
    pub endpoint: String,
    pub host_filter: String,
}

impl ServiceConfig {
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Self::default()
        }
    }

    /// SOAP action URI for the single supported operation.
    pub fn action(&self) -> String {
        format!("{ACTION_BASE}{OPERATION}")
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: SECURED_ENDPOINT.to_string(),
            host_filter: CDN_HOST_FILTER.to_string(),
        }
    }
}
