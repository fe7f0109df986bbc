pub mod binance;

use crate::error::Result;
use crate::snapshot::PermissionSnapshot;

/// A source produces the permission snapshot for one credential.
///
/// This is the inbound boundary of the audit: implementations own the
/// credential material, transport, and signing; the core only ever sees
/// the finished snapshot.
pub trait PermissionSource {
    /// Short label for the credential, safe to print (never the secret).
    fn label(&self) -> String;

    /// Fetch the snapshot, or a failure signal if the audit cannot run.
    fn fetch(&self) -> Result<PermissionSnapshot>;
}
