pub mod api_repo;
