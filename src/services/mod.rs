//! # Service Layer
//!
//! Business operations shared by the REST and RPC surfaces.

pub mod pet_service;

pub use pet_service::{
    CreatePetInput, DeleteResult, ListPets, PetRecord, PetService, REST_PAGE_SIZE,
    RPC_DEFAULT_LIMIT, RPC_MAX_LIMIT, UpdatePetInput, rpc_limit,
};
