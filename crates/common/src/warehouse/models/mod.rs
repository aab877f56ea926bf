//! SeaORM entity models
//!
//! Analytical store entities consumed by the downstream read API and
//! dashboard, produced by the pipeline loader.

mod faculty;
mod faculty_analytics;
mod faculty_research_area;
mod publication;
mod research_analytics;
mod research_area;

pub use faculty::{
    ActiveModel as FacultyActiveModel,
    Column as FacultyColumn,
    Entity as FacultyEntity,
    Model as Faculty,
};

pub use research_area::{
    ActiveModel as ResearchAreaActiveModel,
    Column as ResearchAreaColumn,
    Entity as ResearchAreaEntity,
    Model as ResearchArea,
};

pub use faculty_research_area::{
    ActiveModel as FacultyResearchAreaActiveModel,
    Column as FacultyResearchAreaColumn,
    Entity as FacultyResearchAreaEntity,
    Model as FacultyResearchArea,
};

pub use publication::{
    ActiveModel as PublicationActiveModel,
    Column as PublicationColumn,
    Entity as PublicationEntity,
    Model as Publication,
};

pub use faculty_analytics::{
    ActiveModel as FacultyAnalyticsActiveModel,
    Column as FacultyAnalyticsColumn,
    Entity as FacultyAnalyticsEntity,
    Model as FacultyAnalyticsRow,
};

pub use research_analytics::{
    ActiveModel as ResearchAnalyticsActiveModel,
    Column as ResearchAnalyticsColumn,
    Entity as ResearchAnalyticsEntity,
    Model as ResearchAnalyticsRow,
};
