use std::path::PathBuf;
use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::loader;
use super::mappers::{self, bin_packing};
use crate::domain::{Bin, Item, SolverBackend, SolverConfig, SolverService};
use crate::packing::{BinPacker, UnsolvableError};
use crate::solver::SolverFactory;

/// Picks the backend that serves a request
pub type SolverProvider = Arc<dyn Fn(SolverBackend) -> Arc<dyn SolverService> + Send + Sync>;

/// Where the default instance served by `PackDefaultInstance` lives
#[derive(Debug, Clone)]
pub struct DefaultInstance {
    pub bins_csv: PathBuf,
    pub items_csv: PathBuf,
}

/// gRPC service implementation
pub struct GrpcBinPackingService {
    config: SolverConfig,
    default_instance: DefaultInstance,
    solvers: SolverProvider,
}

impl GrpcBinPackingService {
    pub fn new(config: SolverConfig, default_instance: DefaultInstance) -> Self {
        Self {
            config,
            default_instance,
            solvers: Arc::new(SolverFactory::create_from_backend),
        }
    }

    pub fn with_solver_provider(mut self, solvers: SolverProvider) -> Self {
        self.solvers = solvers;
        self
    }

    /// Solve off the async runtime; the MILP backends block.
    async fn solve(
        &self,
        bins: Vec<Bin>,
        items: Vec<Item>,
        options: Option<SolverConfig>,
    ) -> Result<Response<bin_packing::PackResult>, Status> {
        let config = options.unwrap_or_else(|| self.config.clone());
        let packer = BinPacker::new((self.solvers)(config.backend)).with_config(config);

        tracing::info!(
            bins = bins.len(),
            items = items.len(),
            solver = packer.solver_name(),
            "packing request"
        );

        let outcome = tokio::task::spawn_blocking(move || {
            let packing = packer.pack(&bins, &items)?;
            Ok::<_, UnsolvableError>(mappers::domain_to_proto_result(
                packing,
                packer.solver_name(),
            ))
        })
        .await
        .map_err(|e| Status::internal(format!("Solver task failed: {}", e)))?;

        match outcome {
            Ok(result) => {
                tracing::info!(bins_used = result.bin_count, "packing found");
                Ok(Response::new(result))
            }
            Err(err) => Err(Status::failed_precondition(err.to_string())),
        }
    }
}

#[tonic::async_trait]
impl bin_packing::bin_packing_solver_server::BinPackingSolver for GrpcBinPackingService {
    async fn pack(
        &self,
        request: Request<bin_packing::PackRequest>,
    ) -> Result<Response<bin_packing::PackResult>, Status> {
        let instance = mappers::proto_to_domain_instance(request.into_inner()).map_err(|e| *e)?;

        self.solve(instance.bins, instance.items, instance.options).await
    }

    async fn pack_stream(
        &self,
        request: Request<tonic::Streaming<bin_packing::PackChunk>>,
    ) -> Result<Response<bin_packing::PackResult>, Status> {
        let mut stream = request.into_inner();

        let mut bins = Vec::new();
        let mut items = Vec::new();
        let mut options = None;

        // Collect all chunks
        while let Some(chunk) = stream.message().await? {
            match chunk.chunk {
                Some(bin_packing::pack_chunk::Chunk::Bin(bin)) => {
                    bins.push(mappers::proto_to_domain_bin(bin));
                }
                Some(bin_packing::pack_chunk::Chunk::Item(item)) => {
                    items.push(mappers::proto_to_domain_item(item));
                }
                Some(bin_packing::pack_chunk::Chunk::Options(opts)) => {
                    options = Some(mappers::proto_to_domain_config(&opts).map_err(|e| *e)?);
                }
                None => {}
            }
        }
        mappers::check_exact(&bins, &items).map_err(|e| *e)?;

        self.solve(bins, items, options).await
    }

    async fn pack_default_instance(
        &self,
        _request: Request<bin_packing::Empty>,
    ) -> Result<Response<bin_packing::PackResult>, Status> {
        let load = |e: loader::LoadError| Status::internal(e.to_string());
        let bins = loader::load_bins(&self.default_instance.bins_csv).map_err(load)?;
        let items = loader::load_items(&self.default_instance.items_csv).map_err(load)?;

        self.solve(bins, items, None).await
    }

    async fn get_available_solvers(
        &self,
        _request: Request<bin_packing::Empty>,
    ) -> Result<Response<bin_packing::AvailableSolvers>, Status> {
        let solvers = vec![
            bin_packing::SolverInfo {
                name: "COIN-OR CBC".to_string(),
                version: "2.10+".to_string(),
                capabilities: vec![
                    "Mixed-Integer Programming".to_string(),
                    "Branch and Bound".to_string(),
                    "Cutting Planes".to_string(),
                ],
            },
            bin_packing::SolverInfo {
                name: "HiGHS".to_string(),
                version: "1.7+".to_string(),
                capabilities: vec![
                    "Mixed-Integer Programming".to_string(),
                    "Presolve".to_string(),
                    "Time Limits".to_string(),
                ],
            },
        ];

        Ok(Response::new(bin_packing::AvailableSolvers { solvers }))
    }
}

#[cfg(test)]
mod tests {
    use super::bin_packing::bin_packing_solver_server::BinPackingSolver;
    use super::*;
    use crate::domain::SolutionStatus;
    use crate::packing::testing::ScriptedSolver;
    use std::io::Write;

    fn missing_instance() -> DefaultInstance {
        DefaultInstance {
            bins_csv: PathBuf::from("/definitely/not/bins.csv"),
            items_csv: PathBuf::from("/definitely/not/items.csv"),
        }
    }

    fn service_with(
        solver: ScriptedSolver,
        default_instance: DefaultInstance,
    ) -> GrpcBinPackingService {
        let solver: Arc<dyn SolverService> = Arc::new(solver);
        GrpcBinPackingService::new(SolverConfig::default(), default_instance)
            .with_solver_provider(Arc::new(move |_: SolverBackend| solver.clone()))
    }

    fn request(bins: &[(&str, u64, u64)], items: &[(&str, u64)]) -> bin_packing::PackRequest {
        bin_packing::PackRequest {
            bins: bins
                .iter()
                .map(|&(id, volume_capacity, cost)| bin_packing::Bin {
                    id: id.to_string(),
                    volume_capacity,
                    cost,
                })
                .collect(),
            items: items
                .iter()
                .map(|&(id, volume)| bin_packing::Item {
                    id: id.to_string(),
                    volume,
                })
                .collect(),
            options: None,
        }
    }

    #[tokio::test]
    async fn test_pack_returns_packing_with_totals() {
        let service = service_with(
            ScriptedSolver::assigning(&[("x", "A"), ("y", "A")], &["A"]),
            missing_instance(),
        );

        let result = service
            .pack(Request::new(request(&[("A", 10, 5), ("B", 5, 1)], &[("x", 6), ("y", 4)])))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(result.bin_count, 1);
        assert_eq!(result.total_cost, 5);
        assert_eq!(result.used_volume, 10);
        assert_eq!(result.bins[0].bin.as_ref().unwrap().id, "A");
        assert_eq!(result.solver_backend, "scripted");
    }

    #[tokio::test]
    async fn test_unsolvable_instance_is_failed_precondition() {
        let service = service_with(
            ScriptedSolver::failing(SolutionStatus::Infeasible),
            missing_instance(),
        );

        let status = service
            .pack(Request::new(request(&[("A", 5, 1)], &[("x", 10)])))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::FailedPrecondition);
        assert!(status.message().contains("Unable to solve the problem!"));
        assert!(status.message().contains("Infeasible"));
    }

    #[tokio::test]
    async fn test_empty_request_packs_nothing() {
        let service = service_with(ScriptedSolver::default(), missing_instance());

        let result = service.pack(Request::new(request(&[("A", 5, 1)], &[]))).await.unwrap();

        assert_eq!(result.get_ref().bin_count, 0);
        assert!(result.get_ref().bins.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_options_are_rejected() {
        let service = service_with(ScriptedSolver::default(), missing_instance());
        let mut pack = request(&[("A", 5, 1)], &[("x", 1)]);
        pack.options = Some(bin_packing::SolverOptions {
            solver: 42,
            time_limit: 0.0,
        });

        let status = service.pack(Request::new(pack)).await.unwrap_err();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_missing_default_instance_is_internal() {
        let service = service_with(ScriptedSolver::default(), missing_instance());

        let status = service
            .pack_default_instance(Request::new(bin_packing::Empty {}))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(status.message().contains("/definitely/not/bins.csv"));
    }

    #[tokio::test]
    async fn test_default_instance_is_loaded_and_packed() {
        let dir = tempfile::tempdir().unwrap();
        let bins_csv = dir.path().join("bins.csv");
        let items_csv = dir.path().join("items.csv");
        let mut bins = std::fs::File::create(&bins_csv).unwrap();
        writeln!(bins, "display_name,volume,cost\nCrate,120,15").unwrap();
        let mut items = std::fs::File::create(&items_csv).unwrap();
        writeln!(items, "display_name,volume\nLamp,12").unwrap();
        let service = service_with(
            ScriptedSolver::assigning(&[("Lamp", "Crate")], &["Crate"]),
            DefaultInstance {
                bins_csv,
                items_csv,
            },
        );

        let result = service
            .pack_default_instance(Request::new(bin_packing::Empty {}))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(result.bin_count, 1);
        assert_eq!(result.total_volume, 120);
    }

    #[tokio::test]
    async fn test_lists_both_backends() {
        let service = service_with(ScriptedSolver::default(), missing_instance());

        let solvers = service
            .get_available_solvers(Request::new(bin_packing::Empty {}))
            .await
            .unwrap()
            .into_inner()
            .solvers;

        let names: Vec<&str> = solvers.iter().map(|solver| solver.name.as_str()).collect();
        assert_eq!(names, vec!["COIN-OR CBC", "HiGHS"]);
    }
}
