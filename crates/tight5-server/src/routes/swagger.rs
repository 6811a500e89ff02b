//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use tight5::domain::entities::{
    CallbackOpportunity, FlowAnalysis, FlowIssue, FlowIssueKind, Impact, JokeImprovement,
    JokeStructureSelection, PerformancePattern, PerformanceInsights, PerformanceSummary,
    PlacementCandidate, PlacementSuggestion, PlacementSuggestions, RoutineJokeSummary,
    RoutineOptimization, RoutineSuggestion, SelectedPartOption, Severity, StructureCategory,
    StructurePart, StructurePartSelection, SuggestionKind, Weakness, WeaknessKind,
    WeaknessLocation, WeaknessReport,
};
use tight5::domain::services::TimeStatus;
use tight5::domain::value_objects::Technique;
use tight5::{
    Energy, Joke, JokeStatus, JokeType, JokeVersion, Outcome, Performance, Routine,
    StructureTemplate, SuggestionSource,
};

use crate::models::{
    AnalyzeJokeRequest, AnalyzeJokeResponse, AnalyzePerformanceRequest, AnalyzeRoutineRequest,
    AnalyzeRoutineResponse, BuildJokeRequest, CreateJokeRequest, CreatePerformanceRequest,
    CreateRoutineRequest, GenerateRequest, GenerationKind, ImproveJokeRequest,
    InsertJokeRequest, JokeResponse, MigrateRequest, MigrateResponse, MoveJokeRequest,
    OptimizeRoutineRequest, RoutineFlowResponse, RoutineResponse, StructureCatalogResponse,
    SuggestionsResponse, UpdateJokeRequest, UpdateRoutineRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Joke endpoints
        super::jokes::list_jokes,
        super::jokes::create_joke,
        super::jokes::get_joke,
        super::jokes::update_joke,
        super::jokes::delete_joke,
        super::jokes::restore_version,
        // Performance endpoints
        super::jokes::list_performances,
        super::jokes::record_performance,
        super::jokes::delete_performance,
        // Routine endpoints
        super::routines::list_routines,
        super::routines::create_routine,
        super::routines::get_routine,
        super::routines::update_routine,
        super::routines::delete_routine,
        super::routines::insert_joke,
        super::routines::remove_joke,
        super::routines::move_joke,
        // Structure endpoints
        super::structures::list_structures,
        super::structures::get_structure,
        super::structures::build_joke,
        // Assistant endpoints
        super::assistant::generate,
        super::assistant::improve,
        super::assistant::analyze_joke,
        super::assistant::analyze_routine,
        super::assistant::optimize_routine,
        super::assistant::analyze_performances,
        super::assistant::analyze_stored_routine,
        // Migrate endpoint
        super::migrate::migrate,
    ),
    info(
        title = "Tight 5 API",
        version = "0.1.0",
        description = "Standup comedy writing workspace: joke library, routines, structure templates and a model-backed writing assistant.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Jokes", description = "Jokes - Library, filters and version history"),
        (name = "Performances", description = "Performances - How a joke went on stage"),
        (name = "Routines", description = "Routines - Running orders against a target time"),
        (name = "Structures", description = "Structures - Joke-construction templates"),
        (name = "Assistant", description = "Assistant - Model-assisted writing, rate limited"),
        (name = "Migrate", description = "Migrate - Import from browser storage"),
    ),
    components(
        schemas(
            // Values
            Energy,
            JokeType,
            JokeStatus,
            Outcome,
            Technique,
            SuggestionSource,
            // Jokes
            Joke,
            JokeVersion,
            JokeStructureSelection,
            StructurePartSelection,
            CreateJokeRequest,
            UpdateJokeRequest,
            JokeResponse,
            // Performances
            Performance,
            CreatePerformanceRequest,
            // Routines
            Routine,
            RoutineSuggestion,
            SuggestionKind,
            TimeStatus,
            CreateRoutineRequest,
            UpdateRoutineRequest,
            RoutineResponse,
            InsertJokeRequest,
            MoveJokeRequest,
            // Structures
            StructureCategory,
            StructurePart,
            StructureTemplate,
            SelectedPartOption,
            StructureCatalogResponse,
            BuildJokeRequest,
            // Assistant
            GenerationKind,
            GenerateRequest,
            SuggestionsResponse,
            ImproveJokeRequest,
            JokeImprovement,
            AnalyzeJokeRequest,
            AnalyzeJokeResponse,
            Weakness,
            WeaknessKind,
            WeaknessLocation,
            Severity,
            WeaknessReport,
            RoutineJokeSummary,
            PlacementCandidate,
            AnalyzeRoutineRequest,
            AnalyzeRoutineResponse,
            FlowAnalysis,
            FlowIssue,
            FlowIssueKind,
            CallbackOpportunity,
            PlacementSuggestion,
            PlacementSuggestions,
            OptimizeRoutineRequest,
            RoutineOptimization,
            PerformanceSummary,
            AnalyzePerformanceRequest,
            PerformancePattern,
            Impact,
            PerformanceInsights,
            RoutineFlowResponse,
            // Migrate
            MigrateRequest,
            MigrateResponse,
        )
    )
)]
pub struct ApiDoc;
