pub mod integrals;

pub use integrals::{AcceptorDonorIntegrals, acceptor_donor, acceptor_nanoparticle};
