pub use skyroute_shared::{
    ApiError, LatLng, PredictReply, PredictRequest, Prediction, Segment, SegmentColor, Waypoint,
};
