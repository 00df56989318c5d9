//! Foundational types shared by every esio crate: the communicator seam, the
//! collective-I/O info bag, and the error taxonomy with its process-global
//! reporter. Nothing here touches a filesystem or a dataset.

mod communicator;
mod error;
mod info;

pub use communicator::{Communicator, SerialCommunicator};
pub use error::{
    current_reporter, fault, failed, invalid_argument, out_of_memory, sanity, set_reporter,
    EsioError, EsioResult, ErrorKind, Reporter, SuspendedReporter,
};
pub use info::InfoBag;
