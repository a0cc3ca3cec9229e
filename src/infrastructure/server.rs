// Infrastructure: Server setup
// Single Responsibility: Manage server lifecycle

use tonic::transport::Server;

use super::config::ServerConfig;
use crate::application::mappers::bin_packing::bin_packing_solver_server::BinPackingSolverServer;
use crate::application::GrpcBinPackingService;

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = GrpcBinPackingService::new(config.solver.clone(), config.default_instance.clone());

    tracing::info!(
        address = %config.address,
        solver = %config.solver.backend,
        time_limit = ?config.solver.time_limit,
        bins_csv = %config.default_instance.bins_csv.display(),
        items_csv = %config.default_instance.items_csv.display(),
        "bin packing server listening"
    );

    Server::builder()
        .add_service(BinPackingSolverServer::new(service))
        .serve(config.address)
        .await?;

    Ok(())
}
